//! Integration tests for logging functionality
//!
//! A global subscriber can only be installed once per process, so the
//! initialization checks live in a single test.

use dumpkit::config::LoggingConfig;
use dumpkit::domain::DumpError;
use dumpkit::logging::{init_logging, LOG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert!(!config.json);
}

#[test]
fn test_console_config_disables_file_output() {
    let config = LoggingConfig::console();
    assert!(!config.local_enabled);
    assert!(config.local_path.is_empty());
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let result = init_logging("chatty", &LoggingConfig::console());
    assert!(matches!(result, Err(DumpError::Configuration(_))));
}

#[test]
fn test_file_logging_writes_json_lines() {
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_dir.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
        json: false,
    };

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_dir.is_dir());

    // a second subscriber cannot be installed
    let second = init_logging("info", &LoggingConfig::console());
    assert!(matches!(second, Err(DumpError::Configuration(_))));

    drop(guard);
    let contents = std::fs::read_to_string(log_dir.join(LOG_FILE_NAME)).unwrap();
    let first_line = contents.lines().next().expect("one log line");
    let event: serde_json::Value = serde_json::from_str(first_line).unwrap();
    assert_eq!(event["fields"]["message"], "Logging initialized");
    assert_eq!(event["level"], "DEBUG");
}
