//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "dumpkit.toml")]
    pub output: String,

    /// Include every setting with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing dumpkit configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [catalog] path at your catalog snapshot");
                println!("  2. Validate configuration: dumpkit validate-config");
                println!("  3. Run a dump: dumpkit dump subjects --project-id <id>");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# dumpkit configuration

[application]
log_level = "info"

[scratch]
directory = "./tmp"

[storage]
root = "./storage"
media_file = "./storage/media.json"

[catalog]
path = "./catalog.json"
"#
        .to_string()
    }

    /// Generate configuration with every setting documented
    fn generate_config_with_examples() -> String {
        r#"# dumpkit configuration
#
# Values may reference environment variables as ${VAR_NAME}.
# Any setting can be overridden with DUMPKIT_<SECTION>_<KEY>,
# e.g. DUMPKIT_SCRATCH_DIRECTORY=/var/tmp/dumpkit

[application]
# trace | debug | info | warn | error
log_level = "info"

[scratch]
# Staging CSV and gzip files of running dumps; removed after every run
directory = "./tmp"

[storage]
# Published artifacts are copied under this root
root = "./storage"
# Medium records (JSON array)
media_file = "./storage/media.json"

[compression]
# Read chunk size in KiB
chunk_size_kb = 16
# Gzip level, 0-9
level = 6

[catalog]
# JSON snapshot of projects, workflows and export feeds
path = "./catalog.json"

[logging]
local_enabled = true
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
# JSON console output
json = false
"#
        .to_string()
    }
}
