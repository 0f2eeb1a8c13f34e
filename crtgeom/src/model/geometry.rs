//! Screen geometry as understood by switchres' `-g` option.

use std::fmt;
use std::str::FromStr;

use super::{format_float, ModelError};

/// Default horizontal size step (1%).
pub const H_SIZE_STEP: f64 = 0.01;

/// Default horizontal shift step, in switchres units.
pub const H_SHIFT_STEP: i32 = 1;

/// Default vertical shift step, in switchres units.
pub const V_SHIFT_STEP: i32 = 1;

/// Decimal places switchres echoes for the horizontal size.
const H_SIZE_PRECISION: f64 = 1000.0;

/// Horizontal size and horizontal/vertical shift of the picture.
///
/// Serializes to and from `h_size:h_shift:v_shift`. Equality is field-wise;
/// the calibration loop relies on it to spot geometries switchres clamped.
///
/// # Example
///
/// ```
/// use crtgeom::model::Geometry;
///
/// let mut geometry: Geometry = "1.0:-5:2".parse().unwrap();
/// geometry.inc_h_shift(1, 10);
/// assert_eq!(geometry.to_string(), "1.0:5:2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub h_size: f64,
    pub h_shift: i32,
    pub v_shift: i32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(1.0, 0, 0)
    }
}

impl Geometry {
    pub fn new(h_size: f64, h_shift: i32, v_shift: i32) -> Self {
        Self {
            h_size,
            h_shift,
            v_shift,
        }
    }

    /// Overwrite all three components.
    pub fn set(&mut self, h_size: f64, h_shift: i32, v_shift: i32) {
        *self = Self::new(h_size, h_shift, v_shift);
    }

    pub fn inc_h_size(&mut self, step: f64, factor: i32) {
        self.h_size = round_h_size(self.h_size + step * factor as f64);
    }

    pub fn dec_h_size(&mut self, step: f64, factor: i32) {
        self.h_size = round_h_size(self.h_size - step * factor as f64);
    }

    pub fn inc_h_shift(&mut self, step: i32, factor: i32) {
        self.h_shift = self.h_shift.saturating_add(step.saturating_mul(factor));
    }

    pub fn dec_h_shift(&mut self, step: i32, factor: i32) {
        self.h_shift = self.h_shift.saturating_sub(step.saturating_mul(factor));
    }

    pub fn inc_v_shift(&mut self, step: i32, factor: i32) {
        self.v_shift = self.v_shift.saturating_add(step.saturating_mul(factor));
    }

    pub fn dec_v_shift(&mut self, step: i32, factor: i32) {
        self.v_shift = self.v_shift.saturating_sub(step.saturating_mul(factor));
    }
}

/// Keep h_size on the 3-decimal grid switchres reports, so an accepted value
/// compares equal to its echo.
fn round_h_size(value: f64) -> f64 {
    (value * H_SIZE_PRECISION).round() / H_SIZE_PRECISION
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            format_float(self.h_size),
            self.h_shift,
            self.v_shift
        )
    }
}

impl FromStr for Geometry {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ModelError::InvalidGeometry {
            input: s.to_string(),
            reason,
        };

        let fields: Vec<&str> = s.split(':').map(str::trim).collect();
        let [h_size, h_shift, v_shift] = fields.as_slice() else {
            return Err(invalid(format!("expected 3 fields, found {}", fields.len())));
        };

        let h_size: f64 = h_size
            .parse()
            .map_err(|e| invalid(format!("h_size '{}': {}", h_size, e)))?;
        if !h_size.is_finite() {
            return Err(invalid("h_size must be finite".to_string()));
        }
        let h_shift: i32 = h_shift
            .parse()
            .map_err(|e| invalid(format!("h_shift '{}': {}", h_shift, e)))?;
        let v_shift: i32 = v_shift
            .parse()
            .map_err(|e| invalid(format!("v_shift '{}': {}", v_shift, e)))?;

        Ok(Self::new(h_size, h_shift, v_shift))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let geometry = Geometry::default();
        assert_eq!(geometry, Geometry::new(1.0, 0, 0));
        assert_eq!(geometry.to_string(), "1.0:0:0");
    }

    #[test]
    fn test_parse_switchres_echo() {
        let geometry: Geometry = "1.000:0:0".parse().unwrap();
        assert_eq!(geometry, Geometry::default());
    }

    #[test]
    fn test_parse_negative_shifts() {
        let geometry: Geometry = "0.95:-5:-12".parse().unwrap();
        assert_eq!(geometry, Geometry::new(0.95, -5, -12));
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert!(matches!(
            "1.0:0".parse::<Geometry>(),
            Err(ModelError::InvalidGeometry { .. })
        ));
        assert!("1.0:0:0:0".parse::<Geometry>().is_err());
        assert!("".parse::<Geometry>().is_err());
    }

    #[test]
    fn test_parse_rejects_fractional_shift() {
        assert!("1.0:0.5:0".parse::<Geometry>().is_err());
    }

    #[test]
    fn test_parse_rejects_nan() {
        assert!("nan:0:0".parse::<Geometry>().is_err());
    }

    #[test]
    fn test_h_size_steps_stay_on_grid() {
        let mut geometry = Geometry::default();
        for _ in 0..3 {
            geometry.inc_h_size(H_SIZE_STEP, 1);
        }
        // Plain float accumulation would give 1.0300000000000002.
        assert_eq!(geometry.h_size, 1.03);
        assert_eq!(geometry, "1.030:0:0".parse().unwrap());
    }

    #[test]
    fn test_h_size_factor() {
        let mut geometry = Geometry::default();
        geometry.dec_h_size(H_SIZE_STEP, 10);
        assert_eq!(geometry.h_size, 0.9);
    }

    #[test]
    fn test_shift_operations() {
        let mut geometry = Geometry::default();
        geometry.inc_h_shift(H_SHIFT_STEP, 1);
        geometry.inc_h_shift(H_SHIFT_STEP, 10);
        geometry.dec_v_shift(V_SHIFT_STEP, 1);
        assert_eq!(geometry, Geometry::new(1.0, 11, -1));

        geometry.dec_h_shift(H_SHIFT_STEP, 10);
        geometry.inc_v_shift(V_SHIFT_STEP, 10);
        assert_eq!(geometry, Geometry::new(1.0, 1, 9));
    }

    #[test]
    fn test_set_overwrites_everything() {
        let mut geometry = Geometry::new(1.2, 4, 4);
        geometry.set(0.9, -1, 2);
        assert_eq!(geometry, Geometry::new(0.9, -1, 2));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_display_parse_roundtrip(
                h_size in -10.0..10.0_f64,
                h_shift in any::<i32>(),
                v_shift in any::<i32>()
            ) {
                let geometry = Geometry::new(h_size, h_shift, v_shift);
                let parsed: Geometry = geometry.to_string().parse()?;
                prop_assert_eq!(parsed, geometry);
            }
        }
    }
}
