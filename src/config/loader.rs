//! Configuration loading and discovery for `bloom.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::BloomConfig;
use crate::generate::Model;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "bloom.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse bloom.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub model: Option<Model>,
    pub scale: Option<u32>,
    pub dither: Option<bool>,
    pub out_dir: Option<PathBuf>,
}

/// Find bloom.toml by walking up from the current working directory, then
/// falling back to `XDG_CONFIG_HOME/pixelbloom/bloom.toml`
/// (or `~/.config/pixelbloom/bloom.toml`).
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find bloom.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pixelbloom").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find bloom.toml by walking up from a specific directory.
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

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`]; when nothing is found the defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<BloomConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(BloomConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<BloomConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: BloomConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut BloomConfig, overrides: &CliOverrides) {
    if let Some(model) = overrides.model {
        config.generation.model = model;
    }
    if let Some(scale) = overrides.scale {
        config.render.scale = scale;
    }
    if let Some(dither) = overrides.dither {
        config.render.dither = dither;
    }
    if let Some(ref dir) = overrides.out_dir {
        config.output.dir = dir.clone();
    }
}
