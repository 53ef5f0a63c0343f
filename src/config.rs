//! Configuration module.
//!
//! Handles loading, validating, and merging `framer.toml`. Stock defaults
//! are overridden by whatever keys the user file sets; the file itself is
//! optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [frame]
//! strategy = "fixed-scale"  # or "percentage"
//! size = 10                 # 0-30
//!
//! [preview]
//! width = 375               # Preview box, logical units
//! height = 375
//! scale = 1.0               # Pixels per logical unit of preview output
//!
//! [output]
//! quality = 90              # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{FrameSize, FrameWidthStrategy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "framer.toml";

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

/// Configuration loaded from `framer.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramerConfig {
    /// Frame width policy and default frame size.
    pub frame: FrameConfig,
    /// Preview box used by the `preview` command.
    pub preview: PreviewConfig,
    /// Encoding of written images.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl FramerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.size > FrameSize::MAX {
            return Err(ConfigError::Validation(format!(
                "frame.size must be 0-{}",
                FrameSize::MAX
            )));
        }
        if !(self.preview.width > 0.0 && self.preview.height > 0.0) {
            return Err(ConfigError::Validation(
                "preview.width and preview.height must be positive".into(),
            ));
        }
        if !(self.preview.scale.is_finite() && self.preview.scale > 0.0) {
            return Err(ConfigError::Validation(
                "preview.scale must be positive".into(),
            ));
        }
        if self.output.quality == 0 || self.output.quality > 100 {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Which frame width policy turns the size into pixels.
    pub strategy: FrameWidthStrategy,
    /// Frame size used when the command line does not give one.
    pub size: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            strategy: FrameWidthStrategy::default(),
            size: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 375.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { quality: 90 }
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
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(FramerConfig::default())?)
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

/// Merge user TOML text over the stock defaults, then deserialize and validate.
pub fn parse_config(content: &str) -> Result<FramerConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: FramerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// A missing file yields the stock defaults; an unreadable or invalid one is an error.
pub fn load_config(path: &Path) -> Result<FramerConfig, ConfigError> {
    if !path.exists() {
        return Ok(FramerConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `framer.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Framer Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Frame
# ---------------------------------------------------------------------------
[frame]
# How the frame size becomes a border width, relative to the longest side:
#   "fixed-scale"  width = round(longest side * size * 0.0053)  (size 30 ≈ 16%)
#   "percentage"   width = round(longest side * size / 100)
strategy = "fixed-scale"

# Frame size used when none is given on the command line (0-30).
size = 10

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Box the preview is fitted into, in logical units.
width = 375.0
height = 375.0

# Pixels per logical unit of the preview output (2.0 for a retina-sized preview).
scale = 1.0

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (1 = worst, 100 = best). Other formats are lossless.
quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FramerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.frame.strategy, FrameWidthStrategy::FixedScale);
        assert_eq!(config.frame.size, 10);
        assert_eq!(config.output.quality, 90);
        assert!(config.processing.max_processes.is_none());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config = parse_config(stock_config_toml()).unwrap();
        let defaults = FramerConfig::default();
        assert_eq!(config.frame.strategy, defaults.frame.strategy);
        assert_eq!(config.frame.size, defaults.frame.size);
        assert_eq!(config.preview.width, defaults.preview.width);
        assert_eq!(config.preview.scale, defaults.preview.scale);
        assert_eq!(config.output.quality, defaults.output.quality);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = parse_config(
            r#"
            [frame]
            strategy = "percentage"
            "#,
        )
        .unwrap();
        assert_eq!(config.frame.strategy, FrameWidthStrategy::Percentage);
        assert_eq!(config.frame.size, 10);
        assert_eq!(config.preview.width, 375.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse_config(
            r#"
            [frame]
            colour = "black"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let result = parse_config("[frame]\nstrategy = \"golden-ratio\"\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn out_of_range_frame_size_fails_validation() {
        let result = parse_config("[frame]\nsize = 31\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_quality_fails_validation() {
        let result = parse_config("[output]\nquality = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn non_positive_preview_fails_validation() {
        assert!(parse_config("[preview]\nwidth = 0.0\n").is_err());
        assert!(parse_config("[preview]\nscale = -1.0\n").is_err());
    }

    #[test]
    fn zero_workers_fails_validation() {
        let result = parse_config("[processing]\nmax_processes = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn merge_toml_overrides_nested_keys() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.frame.size, 10);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[frame]\nsize = 25\n[processing]\nmax_processes = 2\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.frame.size, 25);
        assert_eq!(config.processing.max_processes, Some(2));
    }

    #[test]
    fn effective_threads_caps_at_cores() {
        let cores = effective_threads(&ProcessingConfig::default());
        assert!(cores >= 1);
        let config = ProcessingConfig {
            max_processes: Some(usize::MAX),
        };
        assert_eq!(effective_threads(&config), cores);
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }
}
