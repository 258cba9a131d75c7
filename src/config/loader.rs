//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::DumpkitConfig;
use crate::domain::errors::DumpError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Prefix of override variables, e.g. `DUMPKIT_SCRATCH_DIRECTORY`
pub const ENV_PREFIX: &str = "DUMPKIT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DumpkitConfig
/// 4. Applies environment variable overrides (DUMPKIT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`DumpError::Configuration`] if the file cannot be read or parsed,
/// a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use dumpkit::config::loader::load_config;
///
/// let config = load_config("dumpkit.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DumpkitConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DumpError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DumpError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parse configuration text, then apply overrides and validate
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(contents: &str) -> Result<DumpkitConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: DumpkitConfig = toml::from_str(&contents)
        .map_err(|e| DumpError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        DumpError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DumpError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            re.replace_all(line, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                })
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(DumpError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_key(section: &str, key: &str) -> String {
    format!("{ENV_PREFIX}_{section}_{key}")
}

fn env_value(section: &str, key: &str) -> Option<String> {
    std::env::var(env_key(section, key)).ok()
}

fn env_parsed<T: FromStr>(section: &str, key: &str) -> Result<Option<T>> {
    match env_value(section, key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            DumpError::Configuration(format!(
                "Invalid value '{}' for {}",
                raw,
                env_key(section, key)
            ))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using DUMPKIT_* prefix
///
/// Environment variables follow the pattern: DUMPKIT_<SECTION>_<KEY>
/// For example: DUMPKIT_SCRATCH_DIRECTORY, DUMPKIT_COMPRESSION_LEVEL
fn apply_env_overrides(config: &mut DumpkitConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_value("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Scratch overrides
    if let Some(val) = env_value("SCRATCH", "DIRECTORY") {
        config.scratch.directory = PathBuf::from(val);
    }

    // Storage overrides
    if let Some(val) = env_value("STORAGE", "ROOT") {
        config.storage.root = PathBuf::from(val);
    }
    if let Some(val) = env_value("STORAGE", "MEDIA_FILE") {
        config.storage.media_file = PathBuf::from(val);
    }

    // Compression overrides
    if let Some(size) = env_parsed("COMPRESSION", "CHUNK_SIZE_KB")? {
        config.compression.chunk_size_kb = size;
    }
    if let Some(level) = env_parsed("COMPRESSION", "LEVEL")? {
        config.compression.level = level;
    }

    // Catalog overrides
    if let Some(val) = env_value("CATALOG", "PATH") {
        config.catalog.path = PathBuf::from(val);
    }

    // Logging overrides
    if let Some(enabled) = env_parsed("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Some(val) = env_value("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_value("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
    if let Some(json) = env_parsed("LOGGING", "JSON")? {
        config.logging.json = json;
    }

    Ok(())
}
