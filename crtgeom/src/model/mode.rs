//! Requested video mode.

use std::fmt;

use super::{format_float, ModelError};

/// The video mode switchres is asked to produce.
///
/// Fixed for the whole calibration session.
///
/// # Example
///
/// ```
/// use crtgeom::model::Mode;
///
/// let mode = Mode::from_floats(320.0, 240.0, 59.94).unwrap();
/// assert_eq!(mode.to_string(), "320x240@59.94");
/// assert_eq!(mode.args(), ["320", "240", "59.94"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: f64,
}

impl Mode {
    pub fn new(width: u32, height: u32, refresh_rate: f64) -> Self {
        Self {
            width,
            height,
            refresh_rate,
        }
    }

    /// Build a mode from the three numbers given on the command line.
    ///
    /// Width and height are truncated toward zero.
    pub fn from_floats(width: f64, height: f64, refresh_rate: f64) -> Result<Self, ModelError> {
        let invalid = |reason: &str| ModelError::InvalidMode {
            width,
            height,
            refresh_rate,
            reason: reason.to_string(),
        };

        if !width.is_finite() || !height.is_finite() || !refresh_rate.is_finite() {
            return Err(invalid("values must be finite"));
        }
        if width < 1.0 || height < 1.0 {
            return Err(invalid("width and height must be at least 1"));
        }
        if width > u32::MAX as f64 || height > u32::MAX as f64 {
            return Err(invalid("width or height out of range"));
        }
        if refresh_rate <= 0.0 {
            return Err(invalid("refresh rate must be positive"));
        }

        Ok(Self::new(width as u32, height as u32, refresh_rate))
    }

    /// The three positional arguments switchres expects.
    pub fn args(&self) -> [String; 3] {
        [
            self.width.to_string(),
            self.height.to_string(),
            format_float(self.refresh_rate),
        ]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}@{}",
            self.width,
            self.height,
            format_float(self.refresh_rate)
        )
    }
}
