//! Configuration module.
//!
//! Handles loading, validating, and layering `cloudtags.toml`. Stock defaults
//! are overridden by the config file, which is in turn overridden by
//! command-line flags (stock → file → flags).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [cloud]
//! cloud_name = ""           # Required before any URL can be built
//! secure = false            # https instead of http
//! # cname = "img.example.com"
//! resource_type = "image"
//! delivery_type = "upload"
//!
//! # Default srcset applied to tags that don't specify one (omit to disable)
//! # [srcset]
//! # breakpoints = [320, 640, 1280]
//! # sizes = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::breakpoints::{self, ConfigurationError};
use crate::srcset::SrcsetOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(#[from] ConfigurationError),
    #[error("Config validation error: {0}")]
    Invalid(String),
}

/// Top-level configuration loaded from `cloudtags.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Delivery account and URL shape.
    pub cloud: CloudConfig,
    /// Default srcset for tags that don't specify their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcset: Option<SrcsetOptions>,
}

impl Config {
    /// Config with only the cloud name set. Handy for library callers.
    pub fn for_cloud(cloud_name: impl Into<String>) -> Self {
        Self {
            cloud: CloudConfig {
                cloud_name: cloud_name.into(),
                ..CloudConfig::default()
            },
            srcset: None,
        }
    }

    /// Validate values that deserialization alone can't check.
    ///
    /// An empty `cloud_name` is allowed here so `gen-config` and partial files
    /// load; URL building reports it instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cloud.resource_type.is_empty() {
            return Err(ConfigError::Invalid(
                "cloud.resource_type must not be empty".into(),
            ));
        }
        if self.cloud.delivery_type.is_empty() {
            return Err(ConfigError::Invalid(
                "cloud.delivery_type must not be empty".into(),
            ));
        }
        if let Some(srcset) = &self.srcset {
            breakpoints::resolve(&srcset.breakpoint_spec()?)?;
        }
        Ok(())
    }
}

/// Delivery account settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudConfig {
    /// Account identifier, the first path segment of every URL.
    pub cloud_name: String,
    /// Use `https` URLs.
    pub secure: bool,
    /// Custom delivery host replacing the shared one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    /// `image`, `video` or `raw`.
    pub resource_type: String,
    /// `upload`, `fetch`, `private`, ...
    pub delivery_type: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            secure: false,
            cname: None,
            resource_type: "image".to_string(),
            delivery_type: "upload".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
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
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, layering it over stock defaults and then
/// `overrides` (typically built from command-line flags).
pub fn load_config(path: &Path, overrides: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let file = load_raw_config(path)?;
    let config = resolve_config(base, file.into_iter().chain(overrides))?;
    log::debug!("loaded config from {}: {config:?}", path.display());
    Ok(config)
}

/// Returns a fully-commented stock `cloudtags.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cloudtags configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--cloud-name, --secure) override this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Delivery account
# ---------------------------------------------------------------------------
[cloud]
# Account identifier. Must be set (here or via --cloud-name) to build URLs.
cloud_name = ""

# Emit https:// URLs.
secure = false

# Custom delivery host instead of res.cloudinary.com.
# cname = "img.example.com"

# Resource type and delivery type path segments.
resource_type = "image"
delivery_type = "upload"

# ---------------------------------------------------------------------------
# Default srcset
# ---------------------------------------------------------------------------
# Applied to every <img>/<source> that doesn't specify its own srcset.
# Give either an explicit list or a range, not both.
#
# [srcset]
# breakpoints = [320, 640, 1280]
# min_width = 320
# max_width = 1280
# max_images = 3
# sizes = true
# transformation = { crop = "fill", gravity = "auto" }
"##
}
