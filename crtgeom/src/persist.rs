//! Writing a calibrated range back to switchres.ini.
//!
//! switchres.ini is a list of `key value` lines separated by whitespace, with
//! `#` comments. A calibrated range is stored as `crt_range0`, which switchres
//! only honours with `monitor custom`. Both lines are rewritten in place;
//! everything else, including comments and alignment, is preserved.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::model::CrtRange;

/// Default switchres configuration file, relative to the working directory.
pub const DEFAULT_SWITCHRES_INI: &str = "switchres.ini";

const MONITOR_KEY: &str = "monitor";
const MONITOR_CUSTOM: &str = "custom";
const RANGE_KEY: &str = "crt_range0";

/// Errors writing switchres.ini.
#[derive(Debug)]
pub enum ConfigWriteError {
    /// The existing file could not be read.
    ReadFailed { path: PathBuf, source: io::Error },

    /// The updated file could not be written.
    WriteFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for ConfigWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
        }
    }
}

/// Store `range` as the custom monitor range in the switchres.ini at `path`.
///
/// The file is created if it does not exist.
pub fn update_config(range: &CrtRange, path: &Path) -> Result<(), ConfigWriteError> {
    let existing = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(ConfigWriteError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let updated = apply_range(&existing, range);
    fs::write(path, updated).map_err(|source| ConfigWriteError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), crt_range = %range, "Updated switchres configuration");
    Ok(())
}

/// `key [value] [# comment]`, keeping the indentation, separator and comment.
fn key_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\s*)([^\s#]+)(\s*)([^#]*?)(\s*#.*)?$")
            .expect("valid switchres.ini line pattern")
    })
}

/// Rewrite switchres.ini contents so `monitor` is `custom` and `crt_range0`
/// holds `range`. Missing keys are appended.
pub fn apply_range(contents: &str, range: &CrtRange) -> String {
    let range = range.to_string();
    let mut monitor_seen = false;
    let mut range_seen = false;

    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| {
            let Some(caps) = key_value_pattern().captures(line) else {
                return line.to_string();
            };
            let value = match &caps[2] {
                MONITOR_KEY => {
                    monitor_seen = true;
                    MONITOR_CUSTOM
                }
                RANGE_KEY => {
                    range_seen = true;
                    range.as_str()
                }
                _ => return line.to_string(),
            };
            let separator = match &caps[3] {
                "" => "\t",
                separator => separator,
            };
            let comment = caps.get(5).map_or("", |m| m.as_str());
            format!("{}{}{}{}{}", &caps[1], &caps[2], separator, value, comment)
        })
        .collect();

    if !monitor_seen {
        lines.push(format!("{}\t{}", MONITOR_KEY, MONITOR_CUSTOM));
    }
    if !range_seen {
        lines.push(format!("{}\t{}", RANGE_KEY, range));
    }

    let mut updated = lines.join("\n");
    updated.push('\n');
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> CrtRange {
        let mut range: CrtRange =
            "15625.00-16200.00,49.50-65.00,2.000,4.700,8.000,0.064,0.192,1.024,0,0,192,288,448,576"
                .parse()
                .unwrap();
        range
            .refine_from_str("H: 2.004, 4.696, 8.015 V: 0.447, 0.383, 2.425")
            .unwrap();
        range
    }

    const INI: &str = "\
#
# Switchres config
#

# Monitor preset
	monitor                   arcade_15
	orientation               horizontal

# Custom monitor ranges
	crt_range0                auto
	crt_range1                auto
";

    #[test]
    fn test_apply_range_rewrites_in_place() {
        let updated = apply_range(INI, &range());
        let expected = "\
#
# Switchres config
#

# Monitor preset
	monitor                   custom
	orientation               horizontal

# Custom monitor ranges
	crt_range0                15625.0-16200.0,49.5-65.0,2.004,4.696,8.015,0.447,0.383,2.425,0,0,192,288,448,576
	crt_range1                auto
";
        assert_eq!(updated, expected);
    }

    #[test]
    fn test_apply_range_appends_missing_keys() {
        let updated = apply_range("orientation horizontal\n", &range());
        let lines: Vec<&str> = updated.lines().collect();
        assert_eq!(lines[0], "orientation horizontal");
        assert_eq!(lines[1], "monitor\tcustom");
        assert!(lines[2].starts_with("crt_range0\t15625.0-16200.0,"));
    }

    #[test]
    fn test_apply_range_ignores_commented_keys() {
        let updated = apply_range("#crt_range0 auto\n", &range());
        assert!(updated.starts_with("#crt_range0 auto\n"));
        assert!(updated.contains("\ncrt_range0\t"));
    }

    #[test]
    fn test_apply_range_fills_bare_key() {
        let updated = apply_range("monitor\n", &range());
        assert_eq!(updated.matches("monitor").count(), 1);
        assert!(updated.starts_with("monitor\tcustom\n"));
    }

    #[test]
    fn test_apply_range_keeps_inline_comments() {
        let updated = apply_range(
            "monitor    arcade_15   # preset\ncrt_range0 auto # calibrated by hand\n",
            &range(),
        );
        let lines: Vec<&str> = updated.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "monitor    custom   # preset");
        assert!(lines[1].starts_with("crt_range0 15625.0-16200.0,"));
        assert!(lines[1].ends_with(",576 # calibrated by hand"));
    }

    #[test]
    fn test_written_range_reads_back() {
        let updated = apply_range(INI, &range());
        let value = updated
            .lines()
            .find_map(|line| line.trim().strip_prefix("crt_range0"))
            .unwrap();
        let parsed: CrtRange = value.trim().parse().unwrap();
        assert_eq!(parsed, range());
    }

    #[test]
    fn test_update_config_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switchres.ini");

        update_config(&range(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("monitor\tcustom"));
        assert!(contents.contains("crt_range0\t15625.0-16200.0"));
    }

    #[test]
    fn test_update_config_preserves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switchres.ini");
        fs::write(&path, INI).unwrap();

        update_config(&range(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("orientation               horizontal"));
        assert!(contents.contains("crt_range1                auto"));
        assert!(!contents.contains("arcade_15"));
    }

    #[test]
    fn test_update_config_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("switchres.ini");

        let err = update_config(&range(), &path).unwrap_err();
        assert!(matches!(err, ConfigWriteError::WriteFailed { .. }));
        assert!(err.to_string().starts_with("failed to write"));
    }
}
