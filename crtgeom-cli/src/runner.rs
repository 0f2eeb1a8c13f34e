//! Shared setup for commands that talk to switchres.
//!
//! Loads the config file and installs logging once, so individual commands
//! only deal with their own options.

use std::path::PathBuf;

use crtgeom::config::{config_file_path, ConfigFile};
use crtgeom::logging::{init_logging, LogConfig, WorkerGuard};
use tracing::{debug, info};

use crate::error::CliError;

/// Logging options given on the command line.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Raise the default level to `debug`.
    pub verbose: bool,

    /// Log file overriding `[logging] file`.
    pub log_file: Option<PathBuf>,
}

impl LogOptions {
    /// Merge with the `[logging]` section; command line options win.
    pub fn resolve(&self, config: &ConfigFile) -> LogConfig {
        let level = if self.verbose {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        };
        let file = self
            .log_file
            .clone()
            .or_else(|| config.logging.file.clone());

        LogConfig::default().with_level(level).with_file(file)
    }
}

/// Loaded configuration plus the logging guard for the run.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    pub fn new(options: &LogOptions) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let log_guard = init_logging(&options.resolve(&config)).map_err(CliError::Logging)?;

        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(version = crtgeom::VERSION, command, "crtgeom starting");
        debug!(config = %config_file_path().display(), "Configuration loaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_options_default_to_config() {
        let mut config = ConfigFile::default();
        config.logging.level = "warn".to_string();
        config.logging.file = Some(PathBuf::from("/var/log/crtgeom.log"));

        let log = LogOptions::default().resolve(&config);
        assert_eq!(log.level, "warn");
        assert_eq!(log.file, Some(PathBuf::from("/var/log/crtgeom.log")));
    }

    #[test]
    fn test_log_options_override_config() {
        let mut config = ConfigFile::default();
        config.logging.file = Some(PathBuf::from("/var/log/crtgeom.log"));

        let options = LogOptions {
            verbose: true,
            log_file: Some(PathBuf::from("session.log")),
        };
        let log = options.resolve(&config);
        assert_eq!(log.level, "debug");
        assert_eq!(log.file, Some(PathBuf::from("session.log")));
    }
}
