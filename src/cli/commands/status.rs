//! Status command implementation
//!
//! This module implements the `status` command for listing media and
//! whether their exports finished.

use crate::adapters::traits::MediumStore;
use crate::adapters::JsonMediumStore;
use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::config::load_config;
use crate::domain::{LinkedResource, Medium, MediumState, ProjectId};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show media of this project
    #[arg(long)]
    pub project_id: Option<ProjectId>,
}

impl StatusArgs {
    /// Media matching the filter
    pub fn filter(&self, media: Vec<Medium>) -> Vec<Medium> {
        match self.project_id {
            Some(project_id) => {
                let linked = LinkedResource::project(project_id);
                media.into_iter().filter(|m| m.linked == linked).collect()
            }
            None => media,
        }
    }

    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking dump status");

        println!("📊 Dump Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(EXIT_CONFIG);
            }
        };

        let media = match JsonMediumStore::open(config.storage.media_file.clone()).await {
            Ok(store) => store.list().await,
            Err(e) => Err(e),
        };
        let media = match media {
            Ok(m) => self.filter(m),
            Err(e) => {
                println!("❌ Failed to load media");
                println!("   Error: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        if media.is_empty() {
            println!("No media found.");
            println!("Run 'dumpkit dump <target> --project-id <id>' to create one.");
            return Ok(EXIT_OK);
        }

        println!("Found {} medium record(s):", media.len());
        println!();
        println!(
            "{:<8} {:<36} {:<10} {:<12} {:<40}",
            "ID", "Type", "Project", "State", "Path"
        );
        println!("{}", "-".repeat(110));

        for medium in &media {
            let state = match medium.state() {
                MediumState::Ready => "✅ ready",
                MediumState::Creating => "🔄 creating",
            };
            println!(
                "{:<8} {:<36} {:<10} {:<12} {:<40}",
                medium.id,
                medium.medium_type,
                medium.linked.id,
                state,
                medium.storage_path()
            );
        }

        println!();
        Ok(EXIT_OK)
    }
}
