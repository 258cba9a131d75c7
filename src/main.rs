// dumpkit - Versioned project data-export pipeline
// Copyright (c) 2025 Dumpkit Contributors
// Licensed under the MIT License

use clap::Parser;
use dumpkit::cli::{Cli, Commands, EXIT_FATAL};
use dumpkit::config::{load_config, LoggingConfig};
use dumpkit::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Only a dump run logs to files; the other commands log to the console
    let (config_level, logging_config) = match (&cli.command, load_config(&cli.config)) {
        (Commands::Dump(_), Ok(config)) => (Some(config.application.log_level), config.logging),
        _ => (None, LoggingConfig::console()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dumpkit");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // Flush buffered file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Dump(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
