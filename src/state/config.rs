//! Extension configuration
//!
//! Loaded once at startup from `<config_dir>/paint-tool/config.json` and
//! passed by value into the click handler. Every field is optional; a missing
//! file means built-in defaults (OS default opener, PNG, no cleanup).

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ConfigError;

/// Default JPEG quality when the config omits it or holds garbage
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Default naming template: `<YYYYMMDD_HHMMSS>_<index>_<counter>_painted`
pub const DEFAULT_NAMING: &str = "{datetime}_{index}_{counter}_painted";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Image format used for exports
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "JPG")]
    Jpg,
}

impl ExportFormat {
    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            ExportFormat::Png => image::ImageFormat::Png,
            ExportFormat::Jpg => image::ImageFormat::Jpeg,
        }
    }

    /// Case-insensitive parse; `JPEG` is accepted as an alias of `JPG`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PNG" => Some(ExportFormat::Png),
            "JPG" | "JPEG" => Some(ExportFormat::Jpg),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ExportFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let parsed = value.as_str().and_then(ExportFormat::parse);
        Ok(parsed.unwrap_or_else(|| {
            warn!(%value, "unknown export_format, using PNG");
            ExportFormat::Png
        }))
    }
}

/// All user-facing settings of the extension
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    // ========== Launch ==========

    /// External paint program. Unset, blank or missing on disk means the OS
    /// default file-open action is used instead.
    #[serde(deserialize_with = "lenient_opt_string")]
    pub editor_path: Option<String>,

    // ========== Export ==========

    /// Directory exports are written to (defaults to `<data_dir>/paint-tool/exports`)
    #[serde(deserialize_with = "lenient_opt_string")]
    pub export_dir: Option<String>,

    /// Copy file-backed images into `export_dir` instead of opening them in place
    #[serde(deserialize_with = "lenient_bool")]
    pub always_export_copy: bool,

    /// PNG (lossless) or JPG
    pub export_format: ExportFormat,

    /// JPEG quality, clamped to 1-100 when used
    #[serde(deserialize_with = "lenient_quality")]
    pub export_jpeg_quality: i64,

    /// Naming template with `{datetime}`, `{tab}`, `{index}` and `{counter}`
    #[serde(deserialize_with = "lenient_naming")]
    pub export_naming: String,

    // ========== Cleanup ==========

    /// Delete exports older than this many days at startup (0 = disabled)
    #[serde(deserialize_with = "lenient_days")]
    pub export_cleanup_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor_path: None,
            export_dir: None,
            always_export_copy: false,
            export_format: ExportFormat::Png,
            export_jpeg_quality: i64::from(DEFAULT_JPEG_QUALITY),
            export_naming: DEFAULT_NAMING.to_string(),
            export_cleanup_days: 0,
        }
    }
}

/// Accepts a number or a numeric string; anything else falls back to the default
fn lenient_quality<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_int(&value).unwrap_or_else(|| {
        warn!(%value, "invalid export_jpeg_quality, using {}", DEFAULT_JPEG_QUALITY);
        i64::from(DEFAULT_JPEG_QUALITY)
    }))
}

/// Negative values disable cleanup, like 0
fn lenient_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match lenient_int(&value) {
        Some(days) => Ok(days.clamp(0, i64::from(u32::MAX)) as u32),
        None => {
            warn!(%value, "invalid export_cleanup_days, cleanup disabled");
            Ok(0)
        }
    }
}

/// Booleans, `"true"`/`"false"` (any case) and 0/1; anything else is `false`
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        serde_json::Value::Number(n) => n.as_i64().map(|n| n != 0),
        serde_json::Value::Null => Some(false),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        warn!(%value, "invalid boolean setting, using false");
        false
    }))
}

/// Optional path settings: any scalar becomes a string, `null` is unset and
/// arrays or objects are dropped with a warning
fn lenient_opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        other => Ok(scalar_to_string(&other).or_else(|| {
            warn!(value = %other, "invalid path setting, ignoring it");
            None
        })),
    }
}

fn lenient_naming<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_else(|| {
        warn!(%value, "invalid export_naming, using {}", DEFAULT_NAMING);
        DEFAULT_NAMING.to_string()
    }))
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_int(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Config {
    /// Fixed config location: `<config_dir>/paint-tool/config.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("paint-tool");
        path.push("config.json");
        path
    }

    /// Where exports go when `export_dir` is not configured
    pub fn default_export_dir() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("paint-tool");
        path.push("exports");
        path
    }

    /// Load from the fixed location, see [`Config::load_from`]
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, never failing.
    ///
    /// A missing file gives defaults silently; an unreadable or malformed one
    /// gives defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(Some(config)) => {
                info!(path = %path.display(), "loaded config");
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("config load warning: {e}");
                Self::default()
            }
        }
    }

    /// Strict variant of [`Config::load_from`]. `Ok(None)` if the file doesn't exist.
    pub fn try_load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert to a pretty JSON string (for writing a sample config)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Configured editor, with blank values treated as unset
    pub fn editor_path(&self) -> Option<&Path> {
        self.editor_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Path::new)
    }

    /// Resolved export directory
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_export_dir)
    }

    /// JPEG quality clamped to the encoder's 1-100 range
    pub fn jpeg_quality(&self) -> u8 {
        self.export_jpeg_quality.clamp(1, 100) as u8
    }

    /// Naming template, falling back to the default when blank
    pub fn naming_template(&self) -> &str {
        if self.export_naming.trim().is_empty() {
            DEFAULT_NAMING
        } else {
            &self.export_naming
        }
    }

    /// Age past which exports are deleted at startup, `None` when disabled
    pub fn cleanup_max_age(&self) -> Option<Duration> {
        (self.export_cleanup_days > 0)
            .then(|| Duration::from_secs(u64::from(self.export_cleanup_days) * SECONDS_PER_DAY))
    }
}
