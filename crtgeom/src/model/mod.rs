//! Value types exchanged with switchres.
//!
//! - [`Mode`]: the video mode requested for the whole session
//! - [`Geometry`]: operator-adjustable size and position (`1.0:0:0`)
//! - [`CrtRange`]: monitor frequency and timing bounds
//! - [`CrtTiming`]: the porch/sync values switchres reports after adjustment
//!
//! All types serialize to the exact textual forms switchres prints and
//! accepts, so values can be passed straight back on the next invocation.

mod error;
mod geometry;
mod mode;
mod range;

pub use error::ModelError;
pub use geometry::{Geometry, H_SHIFT_STEP, H_SIZE_STEP, V_SHIFT_STEP};
pub use mode::Mode;
pub use range::{CrtRange, CrtTiming};

/// Format a float in shortest round-trip form, keeping a trailing `.0` on
/// integral values (`1.0`, `59.94`, `15625.0`).
pub(crate) fn format_float(value: f64) -> String {
    format!("{:?}", value)
}
