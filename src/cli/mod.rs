//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for dumpkit using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Exit code of a successful command
pub const EXIT_OK: i32 = 0;
/// Exit code of a configuration or usage error
pub const EXIT_CONFIG: i32 = 2;
/// Exit code of a run that was skipped or halted without publishing
pub const EXIT_NOT_PUBLISHED: i32 = 3;
/// Exit code of a failed run
pub const EXIT_FATAL: i32 = 5;
/// Exit code after an interrupt signal
pub const EXIT_INTERRUPTED: i32 = 130;

/// dumpkit - versioned data export pipeline
#[derive(Parser, Debug)]
#[command(name = "dumpkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "dumpkit.toml", env = "DUMPKIT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DUMPKIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one export of a project
    Dump(commands::dump::DumpArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List media and their states
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediumId, ProjectId};

    #[test]
    fn test_cli_parse_dump() {
        let cli = Cli::parse_from(["dumpkit", "dump", "subjects", "--project-id", "7"]);
        assert_eq!(cli.config, "dumpkit.toml");
        match cli.command {
            Commands::Dump(args) => {
                assert_eq!(args.target, "subjects");
                assert_eq!(args.project_id, ProjectId::new(7));
                assert!(args.medium_id.is_none());
                assert!(args.args.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_dump_with_producer_args() {
        let cli = Cli::parse_from([
            "dumpkit",
            "dump",
            "classifications",
            "--project-id",
            "7",
            "--medium-id",
            "12",
            "--",
            "workflow_id=3",
        ]);
        match cli.command {
            Commands::Dump(args) => {
                assert_eq!(args.medium_id, Some(MediumId::new(12)));
                assert_eq!(args.args, vec!["workflow_id=3".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_project_id() {
        let result = Cli::try_parse_from(["dumpkit", "dump", "subjects", "--project-id", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["dumpkit", "--config", "custom.toml", "status"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["dumpkit", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["dumpkit", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
