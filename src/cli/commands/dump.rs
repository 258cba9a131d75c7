//! Dump command implementation
//!
//! This module implements the `dump` command, which runs one export of a
//! project against the configured catalog and local storage.

use crate::adapters::{JsonMediumStore, LocalArtifactStore, MemoryCatalog};
use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_INTERRUPTED, EXIT_NOT_PUBLISHED, EXIT_OK};
use crate::config::{load_config, DumpkitConfig};
use crate::core::dump::{
    DumpOrchestrator, DumpOutcome, DumpRequest, DumpSettings, DumpStores, ProducerArgs,
};
use crate::core::producers;
use crate::domain::{MediumId, ProjectId, UserId};
use crate::log_error_with_context;
use clap::Args;
use std::sync::Arc;

/// Arguments for the dump command
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Dump target (classifications, subjects)
    pub target: String,

    /// Project to export
    #[arg(long)]
    pub project_id: ProjectId,

    /// Existing medium to reuse instead of creating a new one
    #[arg(long)]
    pub medium_id: Option<MediumId>,

    /// User who requested the export
    #[arg(long)]
    pub requester_id: Option<UserId>,

    /// Producer arguments, e.g. `workflow_id=12`
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl DumpArgs {
    /// Build the run request
    pub fn request(&self) -> DumpRequest {
        let mut request = DumpRequest::new(self.project_id)
            .with_args(ProducerArgs::new(self.args.iter().cloned()));
        if let Some(medium_id) = self.medium_id {
            request = request.with_medium(medium_id);
        }
        if let Some(requester_id) = self.requester_id {
            request = request.with_requester(requester_id);
        }
        request
    }

    /// Execute the dump command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(
            dump_target = %self.target,
            project_id = %self.project_id,
            "Starting dump command"
        );

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let orchestrator = match self.orchestrator(&config).await {
            Ok(o) => o,
            Err(e) => {
                log_error_with_context!(&e, "Failed to set up dump");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        // Dropping the run future on interrupt still removes its staging files
        let outcome = tokio::select! {
            outcome = orchestrator.run(self.request()) => outcome,
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!(project_id = %self.project_id, "Dump interrupted");
                eprintln!("⚠️  Dump interrupted; the medium stays in the creating state");
                return Ok(EXIT_INTERRUPTED);
            }
        };

        match outcome {
            Ok(DumpOutcome::Published(summary)) => {
                println!("✅ Dump published");
                println!("  Medium: {}", summary.medium_id);
                println!("  Type: {}", summary.dump_type);
                println!("  Path: {}", summary.storage_path);
                if let Some(rows) = summary.rows {
                    println!("  Rows: {rows}");
                }
                println!(
                    "  Size: {} -> {} bytes ({:.1}%)",
                    summary.uncompressed_bytes,
                    summary.compressed_bytes,
                    summary.compression_ratio() * 100.0
                );
                println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
                Ok(EXIT_OK)
            }
            Ok(DumpOutcome::Skipped { project_id }) => {
                println!("⏭️  Project {project_id} not found, nothing to export");
                Ok(EXIT_NOT_PUBLISHED)
            }
            Ok(DumpOutcome::Halted { medium_id, hook }) => {
                println!("⏸️  Dump halted by hook '{hook}', medium {medium_id} not published");
                Ok(EXIT_NOT_PUBLISHED)
            }
            Err(e) => {
                log_error_with_context!(&e, "Dump failed");
                eprintln!("❌ Dump failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    async fn orchestrator(&self, config: &DumpkitConfig) -> crate::domain::Result<DumpOrchestrator> {
        let catalog = Arc::new(MemoryCatalog::from_json_file(&config.catalog.path)?);
        let producer = producers::for_target(&self.target, catalog.clone())?;
        let stores = DumpStores {
            projects: catalog.clone(),
            media: Arc::new(JsonMediumStore::open(config.storage.media_file.clone()).await?),
            artifacts: Arc::new(LocalArtifactStore::new(config.storage.root.clone())),
            workflows: catalog.clone(),
            workflow_contents: catalog,
        };
        let settings = DumpSettings {
            scratch_dir: config.scratch.directory.clone(),
            compression: config.compression.options(),
        };
        Ok(DumpOrchestrator::new(stores, producer, settings))
    }
}
