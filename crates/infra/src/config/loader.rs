//! Configuration loader
//!
//! Loads runner configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If none are set, falls back to loading from file
//! 3. Searches a fixed set of paths for config files
//! 4. If no file exists either, uses the built-in defaults
//!
//! ## Environment Variables
//! - `OSABRIDGE_INTERPRETER`: Interpreter program (default `osascript`)
//! - `OSABRIDGE_TIMEOUT_MS`: Timeout in milliseconds (default `10000`)
//! - `OSABRIDGE_MAX_OUTPUT_BYTES`: Per-stream output cap (default 10 MiB)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./osabridge.json` or `./osabridge.toml` (current working directory)
//! 2. Next to the executable
//!
//! Parent directories are never searched.

use std::path::{Path, PathBuf};

use osabridge_domain::constants::{ENV_INTERPRETER, ENV_MAX_OUTPUT_BYTES, ENV_TIMEOUT_MS};
use osabridge_domain::{OsaBridgeError, Result, RunnerConfig};

/// Load configuration with automatic fallback strategy
///
/// Environment variables win when any of them is set. Otherwise the first
/// config file found by [`find_config_file`] is used, and failing that the
/// defaults.
///
/// # Errors
/// Returns `OsaBridgeError::Config` if a source exists but is malformed or
/// describes an invalid configuration.
pub fn load() -> Result<RunnerConfig> {
    if let Some(config) = load_from_lookup(|key| std::env::var(key).ok())? {
        tracing::info!("Runner configuration loaded from environment variables");
        return Ok(config);
    }

    match find_config_file() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No runner configuration found, using defaults");
            Ok(RunnerConfig::default())
        }
    }
}

/// Load configuration from environment variables
///
/// Unset variables take their defaults, but at least one must be set.
///
/// # Errors
/// Returns `OsaBridgeError::Config` if no variable is set, or if a value
/// is invalid.
pub fn load_from_env() -> Result<RunnerConfig> {
    load_from_lookup(|key| std::env::var(key).ok())?.ok_or_else(|| {
        OsaBridgeError::Config(format!(
            "None of {ENV_INTERPRETER}, {ENV_TIMEOUT_MS}, {ENV_MAX_OUTPUT_BYTES} is set"
        ))
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `OsaBridgeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or the values fail validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<RunnerConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(OsaBridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            OsaBridgeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading runner configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| OsaBridgeError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Search the working directory and the executable's directory for
/// configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let exe_path = std::env::current_exe().ok();
    let exe_dir = exe_path.as_deref().and_then(Path::parent);

    candidate_paths(cwd.as_deref(), exe_dir).into_iter().find(|path| path.exists())
}

/// Candidate config files, in search order.
fn candidate_paths(cwd: Option<&Path>, exe_dir: Option<&Path>) -> Vec<PathBuf> {
    [cwd, exe_dir]
        .into_iter()
        .flatten()
        .flat_map(|dir| [dir.join("osabridge.json"), dir.join("osabridge.toml")])
        .collect()
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<RunnerConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| OsaBridgeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| OsaBridgeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(OsaBridgeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Build a config from whatever `lookup` returns for the known variables.
///
/// `Ok(None)` means none of them was set.
fn load_from_lookup<F>(lookup: F) -> Result<Option<RunnerConfig>>
where
    F: Fn(&str) -> Option<String>,
{
    let interpreter = lookup(ENV_INTERPRETER);
    let timeout_ms = lookup(ENV_TIMEOUT_MS);
    let max_output_bytes = lookup(ENV_MAX_OUTPUT_BYTES);

    if interpreter.is_none() && timeout_ms.is_none() && max_output_bytes.is_none() {
        return Ok(None);
    }

    let mut config = RunnerConfig::default();
    if let Some(interpreter) = interpreter {
        config.interpreter = interpreter;
    }
    if let Some(raw) = timeout_ms {
        config.timeout_ms = parse_number(ENV_TIMEOUT_MS, &raw)?;
    }
    if let Some(raw) = max_output_bytes {
        config.max_output_bytes = parse_number(ENV_MAX_OUTPUT_BYTES, &raw)?;
    }

    config.validate()?;
    Ok(Some(config))
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| OsaBridgeError::Config(format!("Invalid value for {key}: {e}")))
}
