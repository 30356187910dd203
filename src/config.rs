//! Project configuration module.
//!
//! Handles loading, validating, and merging `assets.toml`. The file lives in
//! the project root and is entirely optional: stock defaults are used for
//! every key it does not mention.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! assets_dir = "assets"         # Source images, relative to the project root
//!
//! [ios]
//! path = "ios/App"              # iOS platform directory
//!
//! [icon]
//! background_color = "#ffffff"  # Icons are flattened onto this color
//!
//! [splash]
//! background_color = "#ffffff"       # Canvas for logo-based splashes
//! background_color_dark = "#111111"  # Canvas for the dark variant
//! logo_scale = 0.2                   # Logo size relative to the short edge
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [ios]
//! path = "native/ios/App"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file in the project root.
pub const CONFIG_FILENAME: &str = "assets.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `assets.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory holding the source images, relative to the project root.
    pub assets_dir: String,
    /// iOS project location.
    pub ios: IosConfig,
    /// Icon rendering settings.
    pub icon: IconConfig,
    /// Splash rendering settings.
    pub splash: SplashConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            ios: IosConfig::default(),
            icon: IconConfig::default(),
            splash: SplashConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl AssetsConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_color("icon.background_color", &self.icon.background_color)?;
        parse_color("splash.background_color", &self.splash.background_color)?;
        parse_color(
            "splash.background_color_dark",
            &self.splash.background_color_dark,
        )?;
        if !(self.splash.logo_scale > 0.0 && self.splash.logo_scale <= 1.0) {
            return Err(ConfigError::Validation(
                "splash.logo_scale must be in (0, 1]".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.ios.path.trim().is_empty() {
            return Err(ConfigError::Validation("ios.path must not be empty".into()));
        }
        Ok(())
    }

    pub fn icon_background(&self) -> Result<Color, ConfigError> {
        parse_color("icon.background_color", &self.icon.background_color)
    }

    pub fn splash_background(&self) -> Result<Color, ConfigError> {
        parse_color("splash.background_color", &self.splash.background_color)
    }

    pub fn splash_background_dark(&self) -> Result<Color, ConfigError> {
        parse_color(
            "splash.background_color_dark",
            &self.splash.background_color_dark,
        )
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::Validation(format!("{key}: {e}")))
}

/// iOS project location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IosConfig {
    /// Platform directory, relative to the project root. Asset sets are
    /// resolved below it (`App/Assets.xcassets/...`).
    pub path: String,
}

impl Default for IosConfig {
    fn default() -> Self {
        Self {
            path: "ios/App".to_string(),
        }
    }
}

/// Icon rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconConfig {
    /// App Store icons may not contain alpha; transparent pixels and
    /// padding are flattened onto this color.
    pub background_color: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
        }
    }
}

/// Splash rendering settings, used when a splash is built from a logo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplashConfig {
    pub background_color: String,
    pub background_color_dark: String,
    /// Logo box edge as a fraction of the splash's short edge.
    pub logo_scale: f32,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            background_color_dark: "#111111".to_string(),
            logo_scale: 0.2,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AssetsConfig::default())?)
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

/// Load `assets.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `assets.toml` in the given project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<AssetsConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: AssetsConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `assets.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# assetgen configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory holding the source images, relative to the project root.
# Expected files: icon.png (or icon-only.png), splash.png, splash-dark.png,
# logo.png, logo-dark.png, icon-notification.png, icon-settings.png,
# icon-spotlight.png. Falls back to "resources" when this directory is missing.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# iOS project
# ---------------------------------------------------------------------------
[ios]
# Platform directory. Asset sets live under App/Assets.xcassets/ inside it.
path = "ios/App"

# ---------------------------------------------------------------------------
# Icons
# ---------------------------------------------------------------------------
[icon]
# App Store icons must not contain transparency. Transparent pixels and the
# padding around non-square sources are filled with this color.
background_color = "#ffffff"

# ---------------------------------------------------------------------------
# Splash screens
# ---------------------------------------------------------------------------
[splash]
# When splash.png / splash-dark.png are missing, splashes are built from
# logo.png / logo-dark.png centered on these colors.
background_color = "#ffffff"
background_color_dark = "#111111"

# Logo size as a fraction of the splash's shorter edge (0 < scale <= 1).
logo_scale = 0.2

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
