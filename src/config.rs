//! YAML configuration for mealtag.
//!
//! One file covers logging and the name normalization applied before tag
//! inference. Every section and field is optional.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "kitchen"
//!
//! logging:
//!   level: "info"
//!   json: false
//!
//! inference:
//!   lowercase: true
//!   collapse_whitespace: true
//! ```
//!
//! The taxonomy itself is compiled in and cannot be configured.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use session::SessionConfig;
use taxonomy::NormalizeConfig;
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MealtagConfig {
    /// Configuration format version
    #[serde(default = "default_config_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub inference: InferenceConfig,
}

impl MealtagConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: MealtagConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;
        self.logging.validate()
    }

    /// Session settings derived from the inference section.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            normalize: self.inference.normalize_config(),
        }
    }
}

impl Default for MealtagConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            name: None,
            logging: LoggingConfig::default(),
            inference: InferenceConfig::default(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let level = self.level.to_ascii_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(ConfigLoadError::Validation(format!(
                "logging.level must be one of trace, debug, info, warn, error, off (got {other})"
            ))),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Name rewriting before inference. Both switches default to off, which
/// keeps matching case-sensitive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InferenceConfig {
    #[serde(default)]
    pub lowercase: bool,

    #[serde(default)]
    pub collapse_whitespace: bool,
}

impl InferenceConfig {
    pub fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig {
            lowercase: self.lowercase,
            collapse_whitespace: self.collapse_whitespace,
        }
    }
}

fn default_config_version() -> String {
    "1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
