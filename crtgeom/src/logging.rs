//! Logging initialization.
//!
//! Console output goes to stderr so it never mixes with what the CLI prints on
//! stdout. An optional log file receives the same events without ANSI colours.
//!
//! The filter is taken from `CRTGEOM_LOG`, then `RUST_LOG`, then
//! [`LogConfig::level`].

use std::path::PathBuf;

pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Environment variable overriding the log filter.
pub const LOG_ENV_VAR: &str = "CRTGEOM_LOG";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default filter directive, e.g. `info` or `crtgeom=debug`.
    pub level: String,

    /// Also write events to this file.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file when dropped; keep it alive for
/// the life of the program.
pub fn init_logging(config: &LogConfig) -> std::io::Result<Option<WorkerGuard>> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(config.filter())
        .with(console_layer);

    let Some(path) = &config.file else {
        registry.init();
        return Ok(None);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false);

    registry.with(file_layer).init();
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.file.is_none());
    }

    #[test]
    fn test_builder() {
        let config = LogConfig::default()
            .with_level("debug")
            .with_file(Some(PathBuf::from("/tmp/crtgeom.log")));
        assert_eq!(config.level, "debug");
        assert_eq!(config.file, Some(PathBuf::from("/tmp/crtgeom.log")));
    }
}
