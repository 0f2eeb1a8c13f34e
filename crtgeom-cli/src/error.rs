//! CLI error type.

use std::fmt;

use crtgeom::calibration::CalibrationError;
use crtgeom::config::ConfigError;
use crtgeom::invoker::InvokeError;
use crtgeom::persist::ConfigWriteError;

/// Errors that end a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// Invalid settings from the command line or config file.
    Config(String),

    /// The config file could not be read or written.
    ConfigFile(ConfigError),

    /// Logging could not be set up.
    Logging(std::io::Error),

    /// A probe failed.
    Probe(InvokeError),

    /// The calibration session failed.
    Calibration(CalibrationError),

    /// The calibrated range could not be saved.
    Save(ConfigWriteError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Probe(e) => write!(f, "Probe failed: {}", e),
            CliError::Calibration(e) => write!(f, "Calibration failed: {}", e),
            CliError::Save(e) => write!(f, "Failed to save calibration: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Probe(e) => Some(e),
            CliError::Calibration(e) => Some(e),
            CliError::Save(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<CalibrationError> for CliError {
    fn from(e: CalibrationError) -> Self {
        CliError::Calibration(e)
    }
}

impl From<ConfigWriteError> for CliError {
    fn from(e: ConfigWriteError) -> Self {
        CliError::Save(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = CliError::Config("launch command must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: launch command must not be empty"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_wrapped_error_keeps_source() {
        let err: CliError = ConfigError::UnknownKey("nope".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration file error: unknown configuration key 'nope'"
        );
        assert!(err.source().is_some());
    }
}
