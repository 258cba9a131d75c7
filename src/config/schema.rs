//! Configuration schema types
//!
//! This module defines the configuration structure of dumpkit. Every section
//! has defaults, so an empty file is a valid configuration.

use crate::core::dump::CompressionOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main dumpkit configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpkitConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Scratch space for staging files
    #[serde(default)]
    pub scratch: ScratchConfig,

    /// Artifact and medium storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Gzip settings
    #[serde(default)]
    pub compression: CompressionConfig,

    /// System of record
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DumpkitConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.scratch.validate()?;
        self.storage.validate()?;
        self.compression.validate()?;
        self.catalog.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Scratch directory configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchConfig {
    /// Directory holding the staging CSV and gzip files of running dumps
    #[serde(default = "default_scratch_directory")]
    pub directory: PathBuf,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            directory: default_scratch_directory(),
        }
    }
}

impl ScratchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.as_os_str().is_empty() {
            return Err("scratch.directory cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory published artifacts are copied into
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// JSON file holding medium records
    #[serde(default = "default_media_file")]
    pub media_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            media_file: default_media_file(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("storage.root cannot be empty".to_string());
        }
        if self.media_file.as_os_str().is_empty() {
            return Err("storage.media_file cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Compression configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Read chunk size in KiB
    #[serde(default = "default_chunk_size_kb")]
    pub chunk_size_kb: usize,

    /// Gzip level (0-9)
    #[serde(default = "default_compression_level")]
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            chunk_size_kb: default_chunk_size_kb(),
            level: default_compression_level(),
        }
    }
}

impl CompressionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size_kb == 0 || self.chunk_size_kb > 1024 {
            return Err("compression.chunk_size_kb must be between 1 and 1024".to_string());
        }
        if self.level > 9 {
            return Err("compression.level must be between 0 and 9".to_string());
        }
        Ok(())
    }

    /// Options passed to the compressor
    pub fn options(&self) -> CompressionOptions {
        CompressionOptions {
            chunk_size: self.chunk_size_kb * 1024,
            level: self.level,
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON snapshot of projects, versioned records and export feeds
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl CatalogConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("catalog.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Write JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: default_true(),
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Console-only logging, used before a configuration is loaded
    pub fn console() -> Self {
        Self {
            local_enabled: false,
            local_path: String::new(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scratch_directory() -> PathBuf {
    PathBuf::from("./tmp")
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_media_file() -> PathBuf {
    PathBuf::from("./storage/media.json")
}

fn default_chunk_size_kb() -> usize {
    16
}

fn default_compression_level() -> u32 {
    6
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./catalog.json")
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
