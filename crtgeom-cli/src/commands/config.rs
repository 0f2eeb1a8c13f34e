//! Configuration management CLI commands.
//!
//! `config get`, `config set`, `config list` and `config path` read and edit
//! `~/.crtgeom/config.ini` from the command line.

use std::path::Path;

use clap::Subcommand;
use crtgeom::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., switchres.binary)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., calibration.launch)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    let path = config_file_path();
    match command {
        ConfigCommands::Get { key } => run_get(&path, &key),
        ConfigCommands::Set { key, value } => run_set(&path, &key, &value),
        ConfigCommands::List => run_list(&path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'crtgeom config list' to see available keys.",
            key
        ))
    })
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn run_get(path: &Path, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load_from(path)?;

    println!("{}", display_value(&config_key.get(&config)));
    Ok(())
}

fn run_set(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load_from(path)?;
    config_key.set(&mut config, value)?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));
    Ok(())
}

fn run_list(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;
    print!("{}", list(&config));
    Ok(())
}

/// All settings grouped by section.
fn list(config: &ConfigFile) -> String {
    let mut out = String::from("Configuration Settings\n======================\n");
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();
        if section != current_section {
            out.push_str(&format!("\n[{}]\n", section));
            current_section = section;
        }
        out.push_str(&format!(
            "  {} = {}\n",
            key.key_name(),
            display_value(&key.get(config))
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key() {
        let err = parse_key("switchres.colour").unwrap_err();
        assert!(err.to_string().contains("crtgeom config list"));
    }

    #[test]
    fn test_list_groups_sections() {
        let text = list(&ConfigFile::default());
        assert!(text.starts_with("Configuration Settings\n"));
        assert!(text.contains("\n[switchres]\n  binary = switchres\n"));
        assert!(text.contains("\n[calibration]\n  launch = grid\n"));
        assert!(text.contains("  file = (not set)\n"));
        assert_eq!(text.matches('[').count(), 3);
    }

    #[test]
    fn test_set_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".crtgeom").join("config.ini");

        run_set(&path, "calibration.delay_ms", "750").unwrap();
        run_set(&path, "switchres.display", "1").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.calibration.delay_ms, 750);
        assert_eq!(config.switchres.display, 1);
    }

    #[test]
    fn test_set_rejects_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let err = run_set(&path, "calibration.geometry", "wide").unwrap_err();
        assert!(matches!(err, CliError::ConfigFile(_)));
        assert!(!path.exists());
    }
}
