//! User configuration file.
//!
//! Settings live in `~/.crtgeom/config.ini`:
//!
//! ```ini
//! [switchres]
//! binary = switchres
//! ini = switchres.ini
//! display = 0
//!
//! [calibration]
//! launch = grid
//! delay_ms = 2000
//! feedback_variable = GRID_TEXT
//! geometry = 1.0:0:0
//!
//! [logging]
//! level = info
//! file =
//! ```
//!
//! A missing file or key falls back to the built-in default. Command line
//! options take precedence over everything here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::calibration::{DEFAULT_DELAY, DEFAULT_LAUNCH_COMMAND};
use crate::feedback::DEFAULT_FEEDBACK_VARIABLE;
use crate::invoker::DEFAULT_SWITCHRES_BINARY;
use crate::model::Geometry;
use crate::persist::DEFAULT_SWITCHRES_INI;

const CONFIG_DIR: &str = ".crtgeom";
const CONFIG_FILE: &str = "config.ini";

/// Errors loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[switchres]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchresSettings {
    pub binary: String,
    pub ini: PathBuf,
    pub display: u32,
}

impl Default for SwitchresSettings {
    fn default() -> Self {
        Self {
            binary: DEFAULT_SWITCHRES_BINARY.to_string(),
            ini: PathBuf::from(DEFAULT_SWITCHRES_INI),
            display: 0,
        }
    }
}

/// `[calibration]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSettings {
    pub launch: String,
    pub delay_ms: u64,
    pub feedback_variable: String,
    pub geometry: Geometry,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            launch: DEFAULT_LAUNCH_COMMAND.to_string(),
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            feedback_variable: DEFAULT_FEEDBACK_VARIABLE.to_string(),
            geometry: Geometry::default(),
        }
    }
}

impl CalibrationSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub switchres: SwitchresSettings,
    pub calibration: CalibrationSettings,
    pub logging: LoggingSettings,
}

/// Location of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

impl ConfigFile {
    /// Load from [`config_file_path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            return Ok(config);
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }

    /// Save to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path).map_err(write_error)
    }
}

/// A `section.key` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SwitchresBinary,
    SwitchresIni,
    SwitchresDisplay,
    CalibrationLaunch,
    CalibrationDelayMs,
    CalibrationFeedbackVariable,
    CalibrationGeometry,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::SwitchresBinary,
            ConfigKey::SwitchresIni,
            ConfigKey::SwitchresDisplay,
            ConfigKey::CalibrationLaunch,
            ConfigKey::CalibrationDelayMs,
            ConfigKey::CalibrationFeedbackVariable,
            ConfigKey::CalibrationGeometry,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::SwitchresBinary | ConfigKey::SwitchresIni | ConfigKey::SwitchresDisplay => {
                "switchres"
            }
            ConfigKey::CalibrationLaunch
            | ConfigKey::CalibrationDelayMs
            | ConfigKey::CalibrationFeedbackVariable
            | ConfigKey::CalibrationGeometry => "calibration",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::SwitchresBinary => "binary",
            ConfigKey::SwitchresIni => "ini",
            ConfigKey::SwitchresDisplay => "display",
            ConfigKey::CalibrationLaunch => "launch",
            ConfigKey::CalibrationDelayMs => "delay_ms",
            ConfigKey::CalibrationFeedbackVariable => "feedback_variable",
            ConfigKey::CalibrationGeometry => "geometry",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::SwitchresBinary => config.switchres.binary.clone(),
            ConfigKey::SwitchresIni => config.switchres.ini.display().to_string(),
            ConfigKey::SwitchresDisplay => config.switchres.display.to_string(),
            ConfigKey::CalibrationLaunch => config.calibration.launch.clone(),
            ConfigKey::CalibrationDelayMs => config.calibration.delay_ms.to_string(),
            ConfigKey::CalibrationFeedbackVariable => config.calibration.feedback_variable.clone(),
            ConfigKey::CalibrationGeometry => config.calibration.geometry.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate and store `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        };
        let non_empty = || {
            if value.is_empty() {
                Err(invalid("must not be empty".to_string()))
            } else {
                Ok(value.to_string())
            }
        };

        match self {
            ConfigKey::SwitchresBinary => config.switchres.binary = non_empty()?,
            ConfigKey::SwitchresIni => config.switchres.ini = PathBuf::from(non_empty()?),
            ConfigKey::SwitchresDisplay => {
                config.switchres.display = value.parse().map_err(|e| invalid(format!("{}", e)))?
            }
            ConfigKey::CalibrationLaunch => config.calibration.launch = non_empty()?,
            ConfigKey::CalibrationDelayMs => {
                config.calibration.delay_ms =
                    value.parse().map_err(|e| invalid(format!("{}", e)))?
            }
            ConfigKey::CalibrationFeedbackVariable => {
                if value.is_empty() || value.contains('=') {
                    return Err(invalid("not a valid environment variable name".to_string()));
                }
                config.calibration.feedback_variable = value.to_string();
            }
            ConfigKey::CalibrationGeometry => {
                config.calibration.geometry = value.parse().map_err(|e| invalid(format!("{}", e)))?
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_lowercase();
                if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
                    return Err(invalid(
                        "expected one of trace, debug, info, warn, error".to_string(),
                    ));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = (!value.is_empty()).then(|| PathBuf::from(value))
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
