//! Errors raised when parsing model values from text.

use thiserror::Error;

/// A textual value could not be turned into a model type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// A geometry string was not of the form `h_size:h_shift:v_shift`.
    #[error("invalid geometry '{input}': {reason}")]
    InvalidGeometry { input: String, reason: String },

    /// A CRT range string did not have the expected 14 fields.
    #[error("invalid crt range '{input}': {reason}")]
    InvalidRange { input: String, reason: String },

    /// An adjusted timing string did not match `H: a, b, c V: d, e, f`.
    #[error("invalid crt timing '{input}': {reason}")]
    InvalidTiming { input: String, reason: String },

    /// A video mode had a zero or non-finite component.
    #[error("invalid mode {width}x{height}@{refresh_rate}: {reason}")]
    InvalidMode {
        width: f64,
        height: f64,
        refresh_rate: f64,
        reason: String,
    },
}
