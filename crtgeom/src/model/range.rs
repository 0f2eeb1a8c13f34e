//! Monitor CRT range and adjusted timing values.
//!
//! A [`CrtRange`] is the `crt_range` line of a switchres.ini:
//!
//! ```text
//! 15625.00-16200.00,49.50-65.00,2.000,4.700,8.000,0.064,0.192,1.024,0,0,192,288,448,576
//! └ hfreq min-max ─┘ └ vfreq ──┘ └ h porch/sync ┘ └ v porch/sync ┘ │ │ └ line bounds ┘
//!                                                                  pol pol
//! ```
//!
//! When switchres applies a geometry it reports the resulting porch and sync
//! values as a [`CrtTiming`], which [`CrtRange::refine`] folds back into the
//! range without touching frequency bounds, polarities or line counts.

use std::fmt;
use std::str::FromStr;

use super::{format_float, ModelError};

/// Number of comma-separated fields in the textual form.
const RANGE_FIELDS: usize = 14;

/// Frequency and timing bounds of a CRT monitor.
///
/// Porch and pulse values are in microseconds (horizontal) and milliseconds
/// (vertical), as switchres prints them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrtRange {
    pub hfreq_min: f64,
    pub hfreq_max: f64,
    pub vfreq_min: f64,
    pub vfreq_max: f64,
    pub h_front_porch: f64,
    pub h_sync_pulse: f64,
    pub h_back_porch: f64,
    pub v_front_porch: f64,
    pub v_sync_pulse: f64,
    pub v_back_porch: f64,
    pub h_sync_polarity: i32,
    pub v_sync_polarity: i32,
    pub progressive_lines_min: u32,
    pub progressive_lines_max: u32,
    pub interlaced_lines_min: u32,
    pub interlaced_lines_max: u32,
}

impl CrtRange {
    /// Replace the six porch/sync fields with adjusted values.
    pub fn refine(&mut self, timing: &CrtTiming) {
        self.h_front_porch = timing.h_front_porch;
        self.h_sync_pulse = timing.h_sync_pulse;
        self.h_back_porch = timing.h_back_porch;
        self.v_front_porch = timing.v_front_porch;
        self.v_sync_pulse = timing.v_sync_pulse;
        self.v_back_porch = timing.v_back_porch;
    }

    /// Parse a switchres timing report and refine with it.
    ///
    /// The range is left unchanged if the report does not parse.
    pub fn refine_from_str(&mut self, timing: &str) -> Result<(), ModelError> {
        let timing: CrtTiming = timing.parse()?;
        self.refine(&timing);
        Ok(())
    }

    /// A refined copy, leaving `self` untouched.
    pub fn refined(&self, timing: &CrtTiming) -> Self {
        let mut range = *self;
        range.refine(timing);
        range
    }
}

impl fmt::Display for CrtRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{},{}-{},{},{},{},{},{},{},{},{},{},{},{},{}",
            format_float(self.hfreq_min),
            format_float(self.hfreq_max),
            format_float(self.vfreq_min),
            format_float(self.vfreq_max),
            format_float(self.h_front_porch),
            format_float(self.h_sync_pulse),
            format_float(self.h_back_porch),
            format_float(self.v_front_porch),
            format_float(self.v_sync_pulse),
            format_float(self.v_back_porch),
            self.h_sync_polarity,
            self.v_sync_polarity,
            self.progressive_lines_min,
            self.progressive_lines_max,
            self.interlaced_lines_min,
            self.interlaced_lines_max,
        )
    }
}

impl FromStr for CrtRange {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ModelError::InvalidRange {
            input: s.to_string(),
            reason,
        };

        let fields: Vec<&str> = s.trim().split(',').map(str::trim).collect();
        if fields.len() != RANGE_FIELDS {
            return Err(invalid(format!(
                "expected {} fields, found {}",
                RANGE_FIELDS,
                fields.len()
            )));
        }

        let pair = |name: &str, field: &str| -> Result<(f64, f64), ModelError> {
            let (min, max) = field
                .split_once('-')
                .ok_or_else(|| invalid(format!("{} '{}' is not a min-max pair", name, field)))?;
            Ok((
                parse_field(min.trim(), name).map_err(&invalid)?,
                parse_field(max.trim(), name).map_err(&invalid)?,
            ))
        };

        let (hfreq_min, hfreq_max) = pair("hfreq", fields[0])?;
        let (vfreq_min, vfreq_max) = pair("vfreq", fields[1])?;

        Ok(Self {
            hfreq_min,
            hfreq_max,
            vfreq_min,
            vfreq_max,
            h_front_porch: parse_field(fields[2], "h_front_porch").map_err(&invalid)?,
            h_sync_pulse: parse_field(fields[3], "h_sync_pulse").map_err(&invalid)?,
            h_back_porch: parse_field(fields[4], "h_back_porch").map_err(&invalid)?,
            v_front_porch: parse_field(fields[5], "v_front_porch").map_err(&invalid)?,
            v_sync_pulse: parse_field(fields[6], "v_sync_pulse").map_err(&invalid)?,
            v_back_porch: parse_field(fields[7], "v_back_porch").map_err(&invalid)?,
            h_sync_polarity: parse_field(fields[8], "h_sync_polarity").map_err(&invalid)?,
            v_sync_polarity: parse_field(fields[9], "v_sync_polarity").map_err(&invalid)?,
            progressive_lines_min: parse_field(fields[10], "progressive_lines_min")
                .map_err(&invalid)?,
            progressive_lines_max: parse_field(fields[11], "progressive_lines_max")
                .map_err(&invalid)?,
            interlaced_lines_min: parse_field(fields[12], "interlaced_lines_min")
                .map_err(&invalid)?,
            interlaced_lines_max: parse_field(fields[13], "interlaced_lines_max")
                .map_err(&invalid)?,
        })
    }
}

/// Porch and sync values switchres reports for an adjusted geometry.
///
/// Textual form: `H: 2.004, 4.696, 8.015 V: 0.447, 0.383, 2.425`. The
/// horizontal back porch and the vertical front porch share one
/// comma-separated field, split around the `V:` marker.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrtTiming {
    pub h_front_porch: f64,
    pub h_sync_pulse: f64,
    pub h_back_porch: f64,
    pub v_front_porch: f64,
    pub v_sync_pulse: f64,
    pub v_back_porch: f64,
}

impl fmt::Display for CrtTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "H: {}, {}, {} V: {}, {}, {}",
            format_float(self.h_front_porch),
            format_float(self.h_sync_pulse),
            format_float(self.h_back_porch),
            format_float(self.v_front_porch),
            format_float(self.v_sync_pulse),
            format_float(self.v_back_porch),
        )
    }
}

impl FromStr for CrtTiming {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ModelError::InvalidTiming {
            input: s.to_string(),
            reason,
        };

        let pieces: Vec<&str> = s.trim().split(", ").collect();
        let [hfp, hsp, hbp_and_vfp, vsp, vbp] = pieces.as_slice() else {
            return Err(invalid(format!(
                "expected 5 comma-separated pieces, found {}",
                pieces.len()
            )));
        };

        let hfp = hfp
            .strip_prefix("H: ")
            .ok_or_else(|| invalid("missing 'H: ' prefix".to_string()))?;

        let middle: Vec<&str> = hbp_and_vfp.split_whitespace().collect();
        let [hbp, "V:", vfp] = middle.as_slice() else {
            return Err(invalid(format!(
                "expected '<h back porch> V: <v front porch>', found '{}'",
                hbp_and_vfp
            )));
        };

        Ok(Self {
            h_front_porch: parse_field(hfp.trim(), "h_front_porch").map_err(&invalid)?,
            h_sync_pulse: parse_field(hsp.trim(), "h_sync_pulse").map_err(&invalid)?,
            h_back_porch: parse_field(hbp, "h_back_porch").map_err(&invalid)?,
            v_front_porch: parse_field(vfp, "v_front_porch").map_err(&invalid)?,
            v_sync_pulse: parse_field(vsp.trim(), "v_sync_pulse").map_err(&invalid)?,
            v_back_porch: parse_field(vbp.trim(), "v_back_porch").map_err(&invalid)?,
        })
    }
}

fn parse_field<T>(value: &str, name: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("{} '{}': {}", name, value, e))
}
