//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the dumpkit configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Scratch Directory: {}", config.scratch.directory.display());
        println!("  Storage Root: {}", config.storage.root.display());
        println!("  Media File: {}", config.storage.media_file.display());
        println!(
            "  Compression: level {}, {} KiB chunks",
            config.compression.level, config.compression.chunk_size_kb
        );
        println!("  Catalog: {}", config.catalog.path.display());
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        } else {
            println!("  File Logging: disabled");
        }
        println!();
        Ok(EXIT_OK)
    }
}
