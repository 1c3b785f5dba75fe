//! Ingestion configuration.
//!
//! Handles loading, validating, and merging a `gallery-ingest.toml` file.
//! Stock defaults are the base layer; a user file only needs the values it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! target_dir = "public/uploads/pictures"  # Where pictures and thumbnails are stored
//!
//! [display]
//! max_width = 1000          # Box the display copy must fit in
//! max_height = 800
//!
//! [thumbnail]
//! max_width = 350           # Box the gallery thumbnail must fit in
//! max_height = 150
//!
//! [encoding]
//! quality = 90              # JPEG quality (1-100)
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only make thumbnails square
//! [thumbnail]
//! max_height = 350
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Bounds, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Ingestion configuration loaded from `gallery-ingest.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Directory holding display files and thumbnails.
    pub target_dir: PathBuf,
    /// Box for the display copy.
    pub display: Bounds,
    /// Box for the thumbnail.
    pub thumbnail: Bounds,
    /// Output encoding settings.
    pub encoding: EncodingConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("public/uploads/pictures"),
            display: Bounds::DISPLAY,
            thumbnail: Bounds::THUMBNAIL,
            encoding: EncodingConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "target_dir must not be empty".into(),
            ));
        }
        if self.display.is_empty() {
            return Err(ConfigError::Validation(
                "display.max_width and display.max_height must be non-zero".into(),
            ));
        }
        if self.thumbnail.is_empty() {
            return Err(ConfigError::Validation(
                "thumbnail.max_width and thumbnail.max_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.encoding.quality) {
            return Err(ConfigError::Validation(
                "encoding.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.encoding.quality)
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    /// JPEG encoding quality (1 = worst, 100 = best). PNG output is lossless.
    pub quality: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(IngestConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<IngestConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: IngestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<IngestConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# gallery-ingest configuration
# ============================
#
# Every key is optional. Missing keys keep the values shown here.
# Unknown keys are rejected.

# Directory where display pictures and thumbnails are written.
# Created on first upload if it does not exist.
target_dir = "public/uploads/pictures"

# Box the display picture is fitted into. The aspect ratio is kept: the
# picture is scaled until one side touches the box.
[display]
max_width = 1000
max_height = 800

# Box the gallery thumbnail is fitted into, computed from the original
# picture the same way.
[thumbnail]
max_width = 350
max_height = 150

[encoding]
# JPEG quality, 1 (smallest) to 100 (best). PNG output is always lossless.
quality = 90
"##
}
