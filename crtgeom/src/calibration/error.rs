//! Errors that end a calibration session.

use thiserror::Error;

use crate::invoker::InvokeError;
use crate::model::ModelError;

/// A calibration session could not continue.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// The initial query-only run failed, so there is no reference range.
    #[error("baseline probe failed: {0}")]
    Baseline(#[source] InvokeError),

    /// A run during the adjustment cycle failed.
    #[error("switchres run failed: {0}")]
    Invoke(#[from] InvokeError),

    /// switchres echoed a geometry that does not parse.
    #[error("unusable geometry from switchres: {0}")]
    Geometry(#[from] ModelError),
}
