//! Integration tests for configuration loading and validation
//!
//! Tests touching environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use dumpkit::config::load_config;
use dumpkit::domain::DumpError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("DUMPKIT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("DUMPKIT_SCRATCH_DIRECTORY");
    std::env::remove_var("DUMPKIT_COMPRESSION_LEVEL");
    std::env::remove_var("DUMPKIT_COMPRESSION_CHUNK_SIZE_KB");
    std::env::remove_var("DUMPKIT_LOGGING_LOCAL_ENABLED");
    std::env::remove_var("TEST_DUMPKIT_DATA");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[scratch]
directory = "/var/tmp/dumpkit"

[storage]
root = "/srv/exports"
media_file = "/srv/exports/media.json"

[compression]
chunk_size_kb = 64
level = 9

[catalog]
path = "/srv/catalog.json"

[logging]
local_enabled = false
local_rotation = "hourly"
json = true
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.scratch.directory, PathBuf::from("/var/tmp/dumpkit"));
    assert_eq!(config.storage.root, PathBuf::from("/srv/exports"));
    assert_eq!(config.storage.media_file, PathBuf::from("/srv/exports/media.json"));
    assert_eq!(config.compression.chunk_size_kb, 64);
    assert_eq!(config.compression.level, 9);
    assert_eq!(config.catalog.path, PathBuf::from("/srv/catalog.json"));
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
    assert!(config.logging.json);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_DUMPKIT_DATA", "/data");

    let file = write_config(
        r#"
[storage]
root = "${TEST_DUMPKIT_DATA}/exports"
media_file = "${TEST_DUMPKIT_DATA}/media.json"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.storage.root, PathBuf::from("/data/exports"));
    assert_eq!(config.storage.media_file, PathBuf::from("/data/media.json"));

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[storage]\nroot = \"${TEST_DUMPKIT_DATA}/exports\"\n");

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, DumpError::Configuration(_)));
    assert!(err.to_string().contains("TEST_DUMPKIT_DATA"));
}

#[test]
fn test_env_overrides_win_over_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("DUMPKIT_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("DUMPKIT_SCRATCH_DIRECTORY", "/scratch");
    std::env::set_var("DUMPKIT_COMPRESSION_LEVEL", "1");
    std::env::set_var("DUMPKIT_LOGGING_LOCAL_ENABLED", "false");

    let file = write_config(
        r#"
[application]
log_level = "debug"

[scratch]
directory = "./tmp"

[compression]
level = 9
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.scratch.directory, PathBuf::from("/scratch"));
    assert_eq!(config.compression.level, 1);
    assert!(!config.logging.local_enabled);

    cleanup_env_vars();
}

#[test]
fn test_unparseable_override_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("DUMPKIT_COMPRESSION_CHUNK_SIZE_KB", "lots");

    let file = write_config("");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("DUMPKIT_COMPRESSION_CHUNK_SIZE_KB"));

    cleanup_env_vars();
}

#[test]
fn test_override_is_validated() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("DUMPKIT_APPLICATION_LOG_LEVEL", "chatty");

    let file = write_config("");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid log_level"));

    cleanup_env_vars();
}

#[test]
fn test_invalid_toml() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[scratch\ndirectory = ");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}
