//! Configuration loading and discovery for `felib.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::FelibConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "felib.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse felib.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override source base directory
    pub src: Option<PathBuf>,
    /// Override output base directory
    pub out: Option<PathBuf>,
    /// Number of parallel compiles
    pub jobs: Option<usize>,
    /// Stop after the first failed compile
    pub fail_fast: Option<bool>,
}

/// Find felib.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a felib.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find felib.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a felib.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<FelibConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<FelibConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: FelibConfig = toml::from_str(&contents)?;
    validated(config)
}

fn validated(config: FelibConfig) -> Result<FelibConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Configuration used when no felib.toml is found.
pub fn default_config() -> FelibConfig {
    FelibConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut FelibConfig, overrides: &CliOverrides) {
    if let Some(ref src) = overrides.src {
        config.project.src = src.clone();
    }

    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if let Some(jobs) = overrides.jobs {
        config.build.jobs = jobs;
    }

    if let Some(fail_fast) = overrides.fail_fast {
        config.build.fail_fast = fail_fast;
    }
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the felib.toml file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
