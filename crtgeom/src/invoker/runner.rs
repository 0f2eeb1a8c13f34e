//! Process execution seam.

use std::process::Command;

use tracing::{debug, info, warn};

use super::InvokeError;

/// Captured result of one tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// stdout followed by stderr.
    pub text: String,

    /// Exit status of the tool itself, `None` if killed by a signal.
    pub status: Option<i32>,
}

impl ToolOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: Some(0),
        }
    }
}

/// Runs a command line to completion and captures its output.
///
/// Abstracted so the calibration loop can be driven by canned output in tests.
pub trait ToolRunner {
    /// Run `argv` (program first) with extra environment variables.
    fn run(&mut self, argv: &[String], env: &[(String, String)]) -> Result<ToolOutput, InvokeError>;
}

/// Runs commands as child processes, blocking until they exit.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&mut self, argv: &[String], env: &[(String, String)]) -> Result<ToolOutput, InvokeError> {
        let (program, args) = argv.split_first().ok_or(InvokeError::EmptyCommand)?;

        info!(command = %argv.join(" "), "Calling switchres");

        let output = Command::new(program)
            .args(args)
            .envs(env.iter().map(|(key, value)| (key, value)))
            .output()
            .map_err(|source| InvokeError::Spawn {
                program: program.clone(),
                source,
            })?;

        let text = combine_output(&output.stdout, &output.stderr);

        let status = output.status.code();
        debug!(
            program = %program,
            status = ?status,
            bytes = text.len(),
            "switchres finished"
        );
        if !output.status.success() {
            // The launched program's exit code is what matters, and it is
            // parsed from the text; switchres' own status is informational.
            warn!(program = %program, status = ?status, "switchres exited unsuccessfully");
        }

        Ok(ToolOutput { text, status })
    }
}

/// stdout followed by stderr, each starting on its own line.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(stderr));
    }
    text
}
