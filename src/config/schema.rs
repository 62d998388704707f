//! Configuration schema types for `bloom.toml`
//!
//! Every section and field is optional; missing values take the defaults the
//! CLI would use without a config file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::generate::gemini::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::generate::request::DEFAULT_TEMPERATURE;
use crate::generate::Model;
use crate::renderer::DEFAULT_PIXEL_SIZE;

/// Largest accepted render scale
pub const MAX_SCALE: u32 = 64;

/// `[generation]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model used when `--model` is not given
    pub model: Model,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Endpoint root of the generation service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// `[render]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixel size for single-frame and GIF output
    pub scale: u32,
    /// Apply checkerboard dithering by default
    pub dither: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_PIXEL_SIZE,
            dither: false,
        }
    }
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory generated files are written to
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Complete `bloom.toml` contents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub generation: GenerationConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

/// A single validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bloom.toml: '{}' {}", self.field, self.message)
    }
}

impl ConfigValidationError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl BloomConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            errors.push(ConfigValidationError::new(
                "generation.temperature",
                "must be between 0.0 and 2.0",
            ));
        }
        if self.generation.base_url.trim().is_empty() {
            errors.push(ConfigValidationError::new(
                "generation.base_url",
                "must be a non-empty URL",
            ));
        }
        if self.generation.timeout_secs == 0 {
            errors.push(ConfigValidationError::new(
                "generation.timeout_secs",
                "must be a positive integer",
            ));
        }
        if self.render.scale == 0 || self.render.scale > MAX_SCALE {
            errors.push(ConfigValidationError::new("render.scale", "must be between 1 and 64"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config: BloomConfig = toml::from_str("").unwrap();
        assert_eq!(config, BloomConfig::default());
        assert_eq!(config.render.scale, 20);
        assert_eq!(config.generation.model, Model::Flash);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_sections() {
        let config: BloomConfig = toml::from_str(
            r#"
            [generation]
            model = "gemini-2.5-pro"

            [render]
            dither = true
            "#,
        )
        .unwrap();
        assert_eq!(config.generation.model, Model::Pro);
        assert_eq!(config.generation.timeout_secs, 120);
        assert!(config.render.dither);
        assert_eq!(config.render.scale, 20);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = BloomConfig::default();
        config.render.scale = 0;
        config.generation.temperature = 3.5;
        config.generation.timeout_secs = 0;
        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["generation.temperature", "generation.timeout_secs", "render.scale"]
        );
        assert_eq!(
            errors[2].to_string(),
            "bloom.toml: 'render.scale' must be between 1 and 64"
        );
    }
}
