//! Running switchres and collecting what it reports.
//!
//! ```text
//! SwitchresInvoker ──build_args──► ToolRunner ──text──► parser ──► ProbeResult / LaunchResult
//!        │                            ▲
//!        └── FeedbackSink ──env───────┘
//! ```
//!
//! The invoker has two entry points: [`SwitchresInvoker::probe`] asks switchres
//! to compute a mode without launching anything (`-c`), and
//! [`SwitchresInvoker::launch`] switches mode, runs the calibration program and
//! reports its exit code.

mod args;
mod error;
mod runner;

pub use args::build_args;
pub use error::InvokeError;
pub use runner::{ProcessRunner, ToolOutput, ToolRunner};

use tracing::debug;

use crate::feedback::{FeedbackSink, DEFAULT_FEEDBACK_VARIABLE};
use crate::model::{CrtRange, CrtTiming, Geometry, Mode};
use crate::parser::{self, Field, ParseError};

/// Default switchres binary, looked up in `PATH`.
pub const DEFAULT_SWITCHRES_BINARY: &str = "switchres";

/// Facts from a query-only run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// Monitor range as switchres resolved it.
    pub range: CrtRange,

    /// Geometry switchres applied, as echoed.
    pub geometry: String,
}

/// Facts from a run that launched the calibration program.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchResult {
    /// Exit code of the launched program: the operator's command.
    pub exit_code: i32,

    /// Monitor range as switchres resolved it.
    pub default_range: CrtRange,

    /// `default_range` refined with the adjusted timing.
    pub range: CrtRange,

    /// Porch and sync values for the applied geometry.
    pub timing: CrtTiming,

    /// Geometry switchres applied, as echoed.
    pub geometry: String,
}

/// Invokes switchres with a fixed binary, display and feedback variable.
#[derive(Debug)]
pub struct SwitchresInvoker<R> {
    runner: R,
    binary: String,
    display: u32,
    feedback_variable: String,
}

impl<R: ToolRunner> SwitchresInvoker<R> {
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            display: 0,
            feedback_variable: DEFAULT_FEEDBACK_VARIABLE.to_string(),
        }
    }

    /// Target display index; 0 means the default display.
    pub fn with_display(mut self, display: u32) -> Self {
        self.display = display;
        self
    }

    /// Environment variable the launched program reads feedback from.
    pub fn with_feedback_variable(mut self, variable: impl Into<String>) -> Self {
        self.feedback_variable = variable.into();
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Compute the mode without launching anything.
    pub fn probe<F>(
        &mut self,
        mode: &Mode,
        geometry: &Geometry,
        feedback: &mut F,
    ) -> Result<ProbeResult, InvokeError>
    where
        F: FeedbackSink + ?Sized,
    {
        let text = self.invoke(mode, geometry, None, feedback)?;

        Ok(ProbeResult {
            range: parser::monitor_range(&text)?,
            geometry: parser::adjusted_geometry(&text)?,
        })
    }

    /// Switch mode and run `launch`, returning what the operator asked for.
    pub fn launch<F>(
        &mut self,
        mode: &Mode,
        geometry: &Geometry,
        launch: &str,
        feedback: &mut F,
    ) -> Result<LaunchResult, InvokeError>
    where
        F: FeedbackSink + ?Sized,
    {
        let text = self.invoke(mode, geometry, Some(launch), feedback)?;

        let default_range = parser::monitor_range(&text)?;
        let timing: CrtTiming =
            parser::adjusted_crt_timing(&text)?
                .parse()
                .map_err(|source| ParseError::Model {
                    field: Field::AdjustedTiming,
                    source,
                })?;

        Ok(LaunchResult {
            exit_code: parser::exit_code(&text)?,
            range: default_range.refined(&timing),
            default_range,
            timing,
            geometry: parser::adjusted_geometry(&text)?,
        })
    }

    fn invoke<F>(
        &mut self,
        mode: &Mode,
        geometry: &Geometry,
        launch: Option<&str>,
        feedback: &mut F,
    ) -> Result<String, InvokeError>
    where
        F: FeedbackSink + ?Sized,
    {
        let argv = args::build_args(&self.binary, mode, geometry, launch, self.display);

        feedback.append(&format!("({})", geometry));
        let env = vec![(
            self.feedback_variable.clone(),
            feedback.contents().to_string(),
        )];

        let output = self.runner.run(&argv, &env)?;
        debug!(
            mode = %mode,
            geometry = %geometry,
            launch = launch.unwrap_or("-"),
            bytes = output.text.len(),
            "switchres output captured"
        );
        Ok(output.text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::feedback::TextFeedback;

    /// Runner replaying canned outputs and recording every call.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedRunner {
        pub outputs: VecDeque<String>,
        pub calls: Vec<(Vec<String>, Vec<(String, String)>)>,
    }

    impl ScriptedRunner {
        pub fn new<I, S>(outputs: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                outputs: outputs.into_iter().map(Into::into).collect(),
                calls: Vec::new(),
            }
        }
    }

    impl ToolRunner for ScriptedRunner {
        fn run(
            &mut self,
            argv: &[String],
            env: &[(String, String)],
        ) -> Result<ToolOutput, InvokeError> {
            self.calls.push((argv.to_vec(), env.to_vec()));
            let text = self.outputs.pop_front().ok_or(InvokeError::EmptyCommand)?;
            Ok(ToolOutput::new(text))
        }
    }

    pub(crate) const RANGE_LINE: &str = "Switchres: Monitor range 15625.00-16200.00,49.50-65.00,2.000,4.700,8.000,0.064,0.192,1.024,0,0,192,288,448,576";

    /// Output of a query-only run echoing `geometry`.
    pub(crate) fn probe_output(geometry: &str) -> String {
        format!(
            "{}\nAdjusted geometry ({}) H: 2.000, 4.700, 8.000 V: 0.064, 0.192, 1.024\n",
            RANGE_LINE, geometry
        )
    }

    /// Output of a launch run echoing `geometry` and reporting `exit_code`.
    pub(crate) fn launch_output(geometry: &str, exit_code: i32) -> String {
        format!(
            "{}\nAdjusted geometry ({}) H: 2.004, 4.696, 8.015 V: 0.447, 0.383, 2.425\n\
             Process exited with value {}\n",
            RANGE_LINE, geometry, exit_code
        )
    }

    fn mode() -> Mode {
        Mode::new(320, 240, 59.94)
    }

    #[test]
    fn test_probe() {
        let runner = ScriptedRunner::new([probe_output("1.000:0:0")]);
        let mut invoker = SwitchresInvoker::new(runner, "switchres");
        let mut feedback = TextFeedback::new();

        let result = invoker
            .probe(&mode(), &Geometry::default(), &mut feedback)
            .unwrap();

        assert_eq!(result.geometry, "1.000:0:0");
        assert_eq!(result.range.h_front_porch, 2.0);

        let (argv, env) = &invoker.runner().calls[0];
        assert!(argv.contains(&"-c".to_string()));
        assert_eq!(
            env,
            &vec![("GRID_TEXT".to_string(), "\n(1.0:0:0)".to_string())]
        );
    }

    #[test]
    fn test_probe_without_range_fails() {
        let runner = ScriptedRunner::new(["Adjusted geometry (1.000:0:0) H: 2.0, 4.7, 8.0 V: 0.06, 0.19, 1.02\n"]);
        let mut invoker = SwitchresInvoker::new(runner, "switchres");

        let err = invoker
            .probe(&mode(), &Geometry::default(), &mut TextFeedback::new())
            .unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Parse(ParseError::MissingField {
                field: Field::MonitorRange
            })
        ));
    }

    #[test]
    fn test_launch_refines_range() {
        let runner = ScriptedRunner::new([launch_output("1.010:0:0", 68)]);
        let mut invoker = SwitchresInvoker::new(runner, "switchres")
            .with_display(1)
            .with_feedback_variable("CALIBRATION_TEXT");
        let mut feedback = TextFeedback::new();

        let geometry = Geometry::new(1.01, 0, 0);
        let result = invoker
            .launch(&mode(), &geometry, "grid", &mut feedback)
            .unwrap();

        assert_eq!(result.exit_code, 68);
        assert_eq!(result.geometry, "1.010:0:0");
        assert_eq!(result.default_range.h_front_porch, 2.0);
        assert_eq!(result.range.h_front_porch, 2.004);
        assert_eq!(result.range.v_sync_pulse, 0.383);
        assert_eq!(result.range.hfreq_max, 16200.0);
        assert_eq!(result.timing.h_back_porch, 8.015);

        let (argv, env) = &invoker.runner().calls[0];
        assert!(argv.contains(&"grid 1".to_string()));
        assert_eq!(env[0].0, "CALIBRATION_TEXT");
        assert_eq!(env[0].1, "\n(1.01:0:0)");
    }

    #[test]
    fn test_launch_without_exit_code_fails() {
        let runner = ScriptedRunner::new([probe_output("1.000:0:0")]);
        let mut invoker = SwitchresInvoker::new(runner, "switchres");

        let err = invoker
            .launch(&mode(), &Geometry::default(), "grid", &mut TextFeedback::new())
            .unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Parse(ParseError::MissingField {
                field: Field::ExitCode
            })
        ));
    }

    #[test]
    fn test_launch_with_malformed_timing_fails() {
        let text = format!(
            "{}\nAdjusted geometry (1.000:0:0) H: 2.0, 4.7, 8.0, 0.06, 0.19, 1.02\nProcess exited with value 0\n",
            RANGE_LINE
        );
        let runner = ScriptedRunner::new([text]);
        let mut invoker = SwitchresInvoker::new(runner, "switchres");

        let err = invoker
            .launch(&mode(), &Geometry::default(), "grid", &mut TextFeedback::new())
            .unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Parse(ParseError::Model {
                field: Field::AdjustedTiming,
                ..
            })
        ));
    }

    #[test]
    fn test_feedback_accumulates_across_invocations() {
        let runner = ScriptedRunner::new([probe_output("1.000:0:0"), probe_output("1.000:0:0")]);
        let mut invoker = SwitchresInvoker::new(runner, "switchres");
        let mut feedback = TextFeedback::new();

        invoker
            .probe(&mode(), &Geometry::default(), &mut feedback)
            .unwrap();
        invoker
            .probe(&mode(), &Geometry::new(1.1, 0, 0), &mut feedback)
            .unwrap();

        assert_eq!(feedback.contents(), "\n(1.0:0:0)\n(1.1:0:0)");
        assert_eq!(invoker.runner().calls[1].1[0].1, "\n(1.0:0:0)\n(1.1:0:0)");
    }
}
