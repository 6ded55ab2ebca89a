//! TOML-based configuration for trimerge.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diff::{DiffAlgorithm, DiffOptions};
use crate::errors::ConfigError;
use crate::merge::MergeOptions;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeConfig {
    /// Line diff settings.
    #[serde(default)]
    pub diff: DiffConfig,

    /// Conflict marker rendering.
    #[serde(default)]
    pub markers: MarkerConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Line diff configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffConfig {
    /// Treat lines differing only in whitespace as equal.
    #[serde(default)]
    pub ignore_whitespace: bool,

    /// Diff algorithm: myers, patience, lcs.
    #[serde(default)]
    pub algorithm: DiffAlgorithm,

    /// Diff time budget in milliseconds (0 = unbounded).
    #[serde(default)]
    pub timeout_ms: u64,
}

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// Conflict marker layout.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    /// Ours and theirs only.
    #[default]
    Merge,
    /// Ours, base and theirs.
    Diff3,
}

/// Conflict marker rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkerConfig {
    #[serde(default)]
    pub style: MarkerStyle,

    /// Marker width in characters (default 7).
    #[serde(default = "default_marker_size")]
    pub size: usize,

    #[serde(default = "default_ours_label")]
    pub ours_label: String,

    #[serde(default = "default_theirs_label")]
    pub theirs_label: String,

    #[serde(default = "default_base_label")]
    pub base_label: String,
}

fn default_marker_size() -> usize {
    7
}
fn default_ours_label() -> String {
    "ours".into()
}
fn default_theirs_label() -> String {
    "theirs".into()
}
fn default_base_label() -> String {
    "base".into()
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            style: MarkerStyle::default(),
            size: default_marker_size(),
            ours_label: default_ours_label(),
            theirs_label: default_theirs_label(),
            base_label: default_base_label(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl MergeConfig {
    /// Load a [`MergeConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate that all values are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(3..=32).contains(&self.markers.size) {
            return Err(ConfigError::InvalidValue {
                field: "markers.size".into(),
                detail: format!("marker size must be between 3 and 32, got {}", self.markers.size),
            });
        }
        for (field, label) in [
            ("markers.ours_label", &self.markers.ours_label),
            ("markers.theirs_label", &self.markers.theirs_label),
            ("markers.base_label", &self.markers.base_label),
        ] {
            if label.contains(['\n', '\r']) {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    detail: "label must be a single line".into(),
                });
            }
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".into(),
                detail: format!(
                    "unknown level '{}': use trace, debug, info, warn or error",
                    self.logging.level
                ),
            });
        }

        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Engine options derived from the `[diff]` table.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            diff: DiffOptions {
                ignore_whitespace: self.diff.ignore_whitespace,
                algorithm: self.diff.algorithm,
                timeout: (self.diff.timeout_ms > 0)
                    .then(|| Duration::from_millis(self.diff.timeout_ms)),
            },
        }
    }
}
