//! CLI command implementations.

pub mod calibrate;
pub mod config;
pub mod probe;
