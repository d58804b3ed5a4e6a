//! Configuration file support for HDRProbe.
//!
//! Settings live in `<config_dir>/hdrprobe/config.json`. A missing file is
//! created with defaults on first start; an unreadable one is reported and
//! ignored.

use std::path::{Path, PathBuf};

use hdrprobe_client::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::ui_constants::window;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Environment variable that overrides `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "HDRPROBE_BACKEND_URL";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Processing backend connection
    #[serde(default)]
    pub backend: ClientConfig,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Initial window width in logical pixels
    #[serde(default = "default_window_width")]
    pub window_width: f32,

    /// Initial window height in logical pixels
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_window_width() -> f32 {
    window::DEFAULT_SIZE.0
}

fn default_window_height() -> f32 {
    window::DEFAULT_SIZE.1
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: ClientConfig::default(),
            preferences: UserPreferences::default(),
        }
    }
}

impl AppConfig {
    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("hdrprobe").join("config.json"))
        } else {
            dirs::home_dir().map(|home| home.join(".config").join("hdrprobe").join("config.json"))
        }
    }

    /// Load configuration from `path`. Returns `Ok(None)` if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map(Some)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from the default path, falling back to defaults.
    ///
    /// A missing file is written with defaults. Runs before the logger is
    /// initialized, so problems are returned as warnings for the caller to log.
    pub fn load_or_default() -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let Some(path) = Self::default_path() else {
            warnings.push("Could not determine config directory".to_string());
            return (Self::default(), warnings);
        };

        let config = match Self::load_from(&path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                let config = Self::default();
                if let Err(e) = config.save_to(&path) {
                    warnings.push(format!("Failed to write default config {:?}: {}", path, e));
                }
                config
            }
            Err(e) => {
                warnings.push(format!("Ignoring config file {:?}: {}", path, e));
                Self::default()
            }
        };
        (config, warnings)
    }

    /// Apply `HDRPROBE_BACKEND_URL` if set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_backend_override(std::env::var(BACKEND_URL_ENV).ok());
    }

    fn apply_backend_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            self.backend.base_url = url.trim().to_string();
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::from_json(r#"{"preferences": {"log_level": "debug"}}"#).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.preferences.log_level, LogLevel::Debug);
        assert_eq!(config.preferences.window_width, window::DEFAULT_SIZE.0);
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.backend.timeout_secs, 30);
    }

    #[test]
    fn test_rejects_newer_version() {
        let result = AppConfig::from_json(r#"{"version": 99}"#);
        assert!(matches!(
            result,
            Err(ConfigError::VersionTooNew {
                file_version: 99,
                ..
            })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.backend.base_url = "http://lab:9000".to_string();
        config.preferences.log_level = LogLevel::Trace;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, Some(config));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_backend_override() {
        let mut config = AppConfig::default();
        config.apply_backend_override(Some("  ".to_string()));
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");

        config.apply_backend_override(Some(" http://gpu-box:8000 ".to_string()));
        assert_eq!(config.backend.base_url, "http://gpu-box:8000");
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
