//! crtgeom - interactive CRT geometry calibration through switchres
//!
//! switchres computes video modes for analog CRT monitors and can launch a
//! program in the new mode. This library drives it in a loop: switchres shows
//! a calibration pattern with the current geometry, the operator presses a key,
//! the pattern program exits with a code for that key, and the geometry is
//! adjusted for the next run. Once the operator is happy, the resulting
//! monitor range is written back to switchres.ini.
//!
//! # Modules
//!
//! - [`model`]: Mode, Geometry, CrtRange and CrtTiming
//! - [`parser`]: extraction of facts from switchres' verbose output
//! - [`invoker`]: running switchres
//! - [`engine`]: mapping operator commands to geometry changes
//! - [`calibration`]: the probe / adjust loop
//! - [`feedback`]: status text shown by the launched program
//! - [`persist`]: writing the calibrated range to switchres.ini
//! - [`config`]: user configuration file
//! - [`logging`]: tracing setup

pub mod calibration;
pub mod config;
pub mod engine;
pub mod feedback;
pub mod invoker;
pub mod logging;
pub mod model;
pub mod parser;
pub mod persist;

pub use persist::update_config;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
