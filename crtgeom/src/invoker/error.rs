//! Errors raised while running switchres.

use std::io;

use thiserror::Error;

use crate::parser::ParseError;

/// switchres could not be run, or its output was unusable.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The argument vector had no program.
    #[error("empty command line")]
    EmptyCommand,

    /// The process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The output lacked a required field or carried a malformed one.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
