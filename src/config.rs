// src/config.rs
//! Configuration file parsing
//!
//! The configuration is optional; every field has a default matching the
//! built-in behavior. Supported sections:
//! - [checks] - Enable or disable each check group
//! - [layers] - Image history command and layer size thresholds
//!
//! ```toml
//! [checks]
//! security = true
//!
//! [layers]
//! history_command = "podman"
//! max_layer_bytes = 200000000
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// TOML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Which check groups run
    #[serde(default)]
    pub checks: ChecksSection,

    /// Layer size check settings
    #[serde(default)]
    pub layers: LayersSection,
}

/// Check group toggles
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksSection {
    /// Base image report, size and tag checks
    #[serde(default = "default_true")]
    pub base_image: bool,

    /// General Dockerfile best practices
    #[serde(default = "default_true")]
    pub best_practices: bool,

    /// Layer size analysis via the image history command
    #[serde(default = "default_true")]
    pub layer_sizes: bool,

    /// Security checks (also enabled by `--security`)
    #[serde(default)]
    pub security: bool,
}

impl Default for ChecksSection {
    fn default() -> Self {
        Self {
            base_image: true,
            best_practices: true,
            layer_sizes: true,
            security: false,
        }
    }
}

/// Layer size thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayersSection {
    /// Container CLI providing `history`
    #[serde(default = "default_history_command")]
    pub history_command: String,

    /// Any layer above this many bytes is flagged
    #[serde(default = "default_max_layer_bytes")]
    pub max_layer_bytes: u64,

    /// Growth over the previous layer must exceed this factor...
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,

    /// ...and this many bytes to be flagged
    #[serde(default = "default_min_growth_bytes")]
    pub min_growth_bytes: u64,
}

impl Default for LayersSection {
    fn default() -> Self {
        Self {
            history_command: default_history_command(),
            max_layer_bytes: default_max_layer_bytes(),
            growth_factor: default_growth_factor(),
            min_growth_bytes: default_min_growth_bytes(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_history_command() -> String {
    "docker".to_string()
}

fn default_max_layer_bytes() -> u64 {
    100_000_000
}

fn default_growth_factor() -> f64 {
    1.3
}

fn default_min_growth_bytes() -> u64 {
    50_000_000
}

impl LintConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: LintConfig =
            toml::from_str(content).map_err(|e| Error::ConfigError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.layers.history_command.trim().is_empty() {
            return Err(Error::ConfigError(
                "layers.history_command must not be empty".to_string(),
            ));
        }

        if !self.layers.growth_factor.is_finite() || self.layers.growth_factor < 1.0 {
            return Err(Error::ConfigError(format!(
                "layers.growth_factor must be at least 1.0, got {}",
                self.layers.growth_factor
            )));
        }

        Ok(())
    }
}
