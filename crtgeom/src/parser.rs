//! Extraction of calibration facts from switchres' verbose output.
//!
//! switchres is run with `-v` and prints, among other things:
//!
//! ```text
//! Switchres: Monitor range 15625.00-16200.00,49.50-65.00,2.000,4.700,8.000,0.064,0.192,1.024,0,0,192,288,448,576
//! Adjusted geometry (1.000:0:0) H: 2.004, 4.696, 8.015 V: 0.447, 0.383, 2.425
//! Process exited with value 68
//! ```
//!
//! Each function scans the captured text for the first line starting with its
//! prefix. A missing line is reported as [`ParseError::MissingField`]; the
//! caller decides whether that is fatal.

use thiserror::Error;
use tracing::warn;

use crate::model::{CrtRange, ModelError};

const MONITOR_RANGE_PREFIX: &str = "Switchres: Monitor range ";
const ADJUSTED_GEOMETRY_PREFIX: &str = "Adjusted geometry (";
const EXIT_CODE_PREFIX: &str = "Process exited with value ";

/// Marks the start of the timing report on the adjusted geometry line.
const TIMING_MARKER: &str = "H: ";

/// Width of the `") "` separating the geometry from the timing report.
const GEOMETRY_SUFFIX_LEN: usize = 2;

/// A fact switchres reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MonitorRange,
    AdjustedGeometry,
    AdjustedTiming,
    ExitCode,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::MonitorRange => "monitor range",
            Field::AdjustedGeometry => "adjusted geometry",
            Field::AdjustedTiming => "adjusted crt timing",
            Field::ExitCode => "exit code",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while reading switchres output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// No line carried the expected prefix.
    #[error("couldn't find the {field} in switchres output")]
    MissingField { field: Field },

    /// The line was found but its value is malformed.
    #[error("malformed {field} '{value}': {reason}")]
    MalformedValue {
        field: Field,
        value: String,
        reason: String,
    },

    /// A model value inside the output failed to parse.
    #[error("malformed {field}: {source}")]
    Model {
        field: Field,
        #[source]
        source: ModelError,
    },
}

impl ParseError {
    fn missing(field: Field) -> Self {
        warn!(field = %field, "Field not found in switchres output");
        ParseError::MissingField { field }
    }
}

/// Find the remainder of the first line starting with `prefix`.
fn find_line<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.lines().find_map(|line| line.strip_prefix(prefix))
}

/// The monitor's CRT range as switchres resolved it.
pub fn monitor_range(text: &str) -> Result<CrtRange, ParseError> {
    let value = find_line(text, MONITOR_RANGE_PREFIX)
        .ok_or_else(|| ParseError::missing(Field::MonitorRange))?;

    value.trim().parse().map_err(|source| ParseError::Model {
        field: Field::MonitorRange,
        source,
    })
}

/// Split the adjusted geometry line into its geometry and timing parts.
fn adjusted_line(text: &str, field: Field) -> Result<(&str, &str), ParseError> {
    let rest =
        find_line(text, ADJUSTED_GEOMETRY_PREFIX).ok_or_else(|| ParseError::missing(field))?;

    let marker = rest
        .find(TIMING_MARKER)
        .ok_or_else(|| ParseError::MalformedValue {
            field,
            value: rest.to_string(),
            reason: format!("no '{}' marker", TIMING_MARKER),
        })?;

    let geometry = marker
        .checked_sub(GEOMETRY_SUFFIX_LEN)
        .and_then(|end| rest.get(..end))
        .ok_or_else(|| ParseError::MalformedValue {
            field,
            value: rest.to_string(),
            reason: "no geometry before the timing report".to_string(),
        })?;

    Ok((geometry, &rest[marker..]))
}

/// The geometry switchres actually applied, in `h_size:h_shift:v_shift` form.
///
/// It differs from the requested one when switchres clamped it.
pub fn adjusted_geometry(text: &str) -> Result<String, ParseError> {
    adjusted_line(text, Field::AdjustedGeometry).map(|(geometry, _)| geometry.to_string())
}

/// The timing report following the adjusted geometry, starting at `H: `.
pub fn adjusted_crt_timing(text: &str) -> Result<String, ParseError> {
    adjusted_line(text, Field::AdjustedTiming).map(|(_, timing)| timing.trim_end().to_string())
}

/// Exit code of the program switchres launched.
pub fn exit_code(text: &str) -> Result<i32, ParseError> {
    let value =
        find_line(text, EXIT_CODE_PREFIX).ok_or_else(|| ParseError::missing(Field::ExitCode))?;

    value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ParseError::MalformedValue {
            field: Field::ExitCode,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
