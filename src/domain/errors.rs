//! Domain error types
//!
//! This module defines the error hierarchy for dumpkit. Only
//! [`DumpError::TargetNotFound`] and [`DumpError::VersionReconstruction`] are
//! ever recovered locally; every other variant propagates to the caller.

use thiserror::Error;

/// Main dumpkit error type
#[derive(Debug, Error)]
pub enum DumpError {
    /// The project a dump was requested for no longer exists
    #[error("Dump target not found: project {0}")]
    TargetNotFound(u64),

    /// The row producer failed to write the staging file
    #[error("Production error: {0}")]
    Production(String),

    /// Compression, upload or finalization of the artifact failed
    #[error("Publish error: {0}")]
    Publish(String),

    /// A historical version could not be reconstructed
    #[error("Version reconstruction error: {0}")]
    VersionReconstruction(String),

    /// A record required by the run does not exist
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: &'static str, id: u64 },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Medium or artifact storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl DumpError {
    /// Shorthand for a missing record of the given kind
    pub fn not_found(kind: &'static str, id: u64) -> Self {
        DumpError::RecordNotFound { kind, id }
    }

    /// Whether a retry of the whole run could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DumpError::Production(_) | DumpError::Publish(_) | DumpError::Storage(_) | DumpError::Io(_)
        )
    }
}

impl From<std::io::Error> for DumpError {
    fn from(err: std::io::Error) -> Self {
        DumpError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DumpError {
    fn from(err: serde_json::Error) -> Self {
        DumpError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DumpError {
    fn from(err: toml::de::Error) -> Self {
        DumpError::Configuration(format!("TOML parse error: {err}"))
    }
}
