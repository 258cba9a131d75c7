//! Configuration management for dumpkit.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! dumpkit uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DUMPKIT_<SECTION>_<KEY>` overrides applied after parsing
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dumpkit::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("dumpkit.toml")?;
//!
//! println!("Scratch: {}", config.scratch.directory.display());
//! println!("Storage: {}", config.storage.root.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ScratchConfig`] - Directory for staging files
//! - [`StorageConfig`] - Artifact root and medium records file
//! - [`CompressionConfig`] - Gzip chunk size and level
//! - [`CatalogConfig`] - JSON snapshot of the system of record
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [scratch]
//! directory = "/var/tmp/dumpkit"
//!
//! [storage]
//! root = "${DUMPKIT_DATA}/exports"
//! media_file = "${DUMPKIT_DATA}/media.json"
//!
//! [compression]
//! chunk_size_kb = 16
//! level = 6
//!
//! [catalog]
//! path = "catalog.json"
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CatalogConfig, CompressionConfig, DumpkitConfig, LoggingConfig,
    ScratchConfig, StorageConfig,
};
