//! Application configuration.
//!
//! # Responsibility
//! - Load `config.toml` from the user config directory or an explicit path.
//! - Provide defaults so a missing file is never an error.
//!
//! # Invariants
//! - A present but unreadable or malformed file is an error, not a silent
//!   fallback to defaults.
//! - `utc_offset_minutes` always maps to a valid `FixedOffset`.

use crate::stats::window::DayWindow;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "SAIOS_CONFIG";

const APP_DIR_NAME: &str = "saios";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "saios.sqlite3";
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Serialize(toml::ser::Error),
    InvalidOffset(i32),
    InvalidWindow(u32),
    NoConfigDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to access config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize config: {err}"),
            Self::InvalidOffset(minutes) => write!(
                f,
                "utc_offset_minutes must be within ±{MAX_OFFSET_MINUTES}, got {minutes}"
            ),
            Self::InvalidWindow(days) => {
                write!(f, "default_window_days must be at least 1, got {days}")
            }
            Self::NoConfigDir => write!(f, "cannot determine a config directory"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::InvalidOffset(_) | Self::InvalidWindow(_) | Self::NoConfigDir => None,
        }
    }
}

/// Tracker configuration as stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; logging is off when unset.
    pub log_dir: Option<PathBuf>,
    /// Offset from UTC defining where a calendar day starts.
    pub utc_offset_minutes: i32,
    /// Chart window used when none is requested.
    pub default_window_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            utc_offset_minutes: 0,
            default_window_days: 7,
        }
    }
}

impl AppConfig {
    /// Default config file location: `<config dir>/saios/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Resolves the config path: explicit path, then `SAIOS_CONFIG`, then the
    /// default location.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
            _ => Self::default_path(),
        }
    }

    /// Loads config from `path`, returning defaults when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Writes this config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::InvalidOffset(self.utc_offset_minutes));
        }
        if DayWindow::from_days(self.default_window_days).is_none() {
            return Err(ConfigError::InvalidWindow(self.default_window_days));
        }
        Ok(())
    }

    /// Offset defining local calendar days.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn default_window(&self) -> DayWindow {
        DayWindow::from_days(self.default_window_days).unwrap_or(DayWindow::WEEK)
    }
}
