//! Readjustment state machine.
//!
//! The calibration program encodes the key the operator pressed in its exit
//! code. Bit 7 is a modifier selecting a ten times larger step; the remaining
//! bits select the [`Command`]. [`readjust`] maps the current geometry, range
//! and exit code to the next [`Outcome`].

use tracing::{info, warn};

use crate::model::{CrtRange, Geometry, H_SHIFT_STEP, H_SIZE_STEP, V_SHIFT_STEP};

/// Bit set in the exit code when the modifier key was held.
pub const FAST_STEP_MODIFIER: i32 = 1 << 7;

/// Step multiplier applied when the modifier bit is set.
pub const FAST_STEP_FACTOR: i32 = 10;

/// Operator command decoded from an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Accept the current range and stop (ENTER).
    Commit,
    /// Stop without saving (ESC / Q).
    Abort,
    /// Back to `1.0:0:0` (DEL / BACKSPACE).
    Reset,
    /// Re-run with the same geometry (R).
    Refresh,
    /// Move the picture left (LEFT).
    ShiftLeft,
    /// Move the picture right (RIGHT).
    ShiftRight,
    /// Move the picture up (UP).
    ShiftUp,
    /// Move the picture down (DOWN).
    ShiftDown,
    /// Widen the picture (PAGE UP).
    GrowHSize,
    /// Narrow the picture (PAGE DOWN).
    ShrinkHSize,
    /// Any code without a binding, modifier already removed.
    Unknown(i32),
}

impl Command {
    /// Map a command code, modifier bit excluded.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Command::Commit,
            1 => Command::Abort,
            2 => Command::Reset,
            3 => Command::Refresh,
            64 => Command::ShiftLeft,
            65 => Command::ShiftRight,
            66 => Command::ShiftUp,
            67 => Command::ShiftDown,
            68 => Command::GrowHSize,
            69 => Command::ShrinkHSize,
            other => Command::Unknown(other),
        }
    }

    /// Split an exit code into its command and step factor.
    pub fn decode(code: i32) -> (Self, i32) {
        let factor = if code & FAST_STEP_MODIFIER != 0 {
            FAST_STEP_FACTOR
        } else {
            1
        };
        (Self::from_code(code & !FAST_STEP_MODIFIER), factor)
    }

    /// Whether this command ends the calibration session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Command::Commit | Command::Abort)
    }
}

/// Result of one readjustment.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Run switchres again with this geometry.
    Continue(Geometry),
    /// Operator accepted; persist `range`.
    Commit { geometry: Geometry, range: CrtRange },
    /// Operator gave up.
    Abort { geometry: Geometry },
}

/// Apply the operator's command to `geometry`.
pub fn readjust(geometry: Geometry, range: &CrtRange, exit_code: i32) -> Outcome {
    let (command, factor) = Command::decode(exit_code);
    let mut geometry = geometry;

    match command {
        Command::GrowHSize => geometry.inc_h_size(H_SIZE_STEP, factor),
        Command::ShrinkHSize => geometry.dec_h_size(H_SIZE_STEP, factor),
        Command::ShiftLeft => geometry.dec_h_shift(H_SHIFT_STEP, factor),
        Command::ShiftRight => geometry.inc_h_shift(H_SHIFT_STEP, factor),
        Command::ShiftDown => geometry.inc_v_shift(V_SHIFT_STEP, factor),
        Command::ShiftUp => geometry.dec_v_shift(V_SHIFT_STEP, factor),
        Command::Abort => {
            info!(geometry = %geometry, "Aborted");
            return Outcome::Abort { geometry };
        }
        Command::Commit => {
            info!(geometry = %geometry, crt_range = %range, "Finished");
            return Outcome::Commit {
                geometry,
                range: *range,
            };
        }
        Command::Reset => geometry = Geometry::default(),
        Command::Refresh => {
            info!("Refreshing with the same geometry values");
        }
        Command::Unknown(code) => {
            warn!(exit_code, code, "Unknown command code, geometry unchanged");
        }
    }

    info!(geometry = %geometry, ?command, factor, "Readjusted geometry");
    Outcome::Continue(geometry)
}
