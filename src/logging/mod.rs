//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human readable or JSON console output
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! Dump runs log through `tracing` with the project id, medium id, dump type
//! and phase as structured fields.
//!
//! # Example
//!
//! ```no_run
//! use dumpkit::logging::init_logging;
//! use dumpkit::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard, LOG_FILE_NAME};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use dumpkit::log_error_with_context;
/// use dumpkit::domain::DumpError;
///
/// let error = DumpError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
