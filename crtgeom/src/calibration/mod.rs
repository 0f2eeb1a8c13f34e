//! The interactive calibration loop.
//!
//! # Flow
//!
//! ```text
//! baseline probe (-c) ──► Session { geometry, range }
//!                               │
//!        ┌──────────────────────┘
//!        ▼
//!   launch (-s -l grid) ──► clamp check ──► refine range ──► readjust
//!        ▲                                                     │
//!        └──────────── Continue(geometry), sleep ◄─────────────┤
//!                                                              ▼
//!                                              Commit / Abort: SessionOutcome
//! ```
//!
//! The baseline probe fixes the reference range for the session. Each cycle
//! then shows the calibration program with the working geometry and applies
//! the operator's answer. When switchres echoes a geometry different from the
//! one requested, it clamped the request to the monitor's limits; the loop
//! adopts the echo and tells the operator through the feedback sink.

mod error;

pub use error::CalibrationError;

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::engine::{self, Outcome};
use crate::feedback::{FeedbackSink, OUT_OF_RANGE_NOTICE};
use crate::invoker::{SwitchresInvoker, ToolRunner};
use crate::model::{CrtRange, Geometry, Mode};

/// Program launched by default to display the calibration pattern.
pub const DEFAULT_LAUNCH_COMMAND: &str = "grid";

/// Default pause between switchres runs.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Settings for the adjustment cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Program switchres launches for each adjustment.
    pub launch: String,

    /// Pause between runs so the monitor is not switched back to back.
    pub delay: Duration,

    /// Shown to the operator after switchres clamped a geometry.
    pub out_of_range_notice: String,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            launch: DEFAULT_LAUNCH_COMMAND.to_string(),
            delay: DEFAULT_DELAY,
            out_of_range_notice: OUT_OF_RANGE_NOTICE.to_string(),
        }
    }
}

impl LoopConfig {
    pub fn with_launch(mut self, launch: impl Into<String>) -> Self {
        self.launch = launch.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_out_of_range_notice(mut self, notice: impl Into<String>) -> Self {
        self.out_of_range_notice = notice.into();
        self
    }
}

/// Working state of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    /// Geometry requested on the next run.
    pub geometry: Geometry,

    /// Reference range, refined with the latest adjusted timing.
    pub range: CrtRange,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The operator accepted `range`.
    Committed { geometry: Geometry, range: CrtRange },

    /// The operator gave up.
    Aborted { geometry: Geometry },
}

/// Drives switchres until the operator commits or aborts.
pub struct CalibrationLoop<R, F> {
    invoker: SwitchresInvoker<R>,
    feedback: F,
    mode: Mode,
    config: LoopConfig,
}

impl<R: ToolRunner, F: FeedbackSink> CalibrationLoop<R, F> {
    pub fn new(invoker: SwitchresInvoker<R>, feedback: F, mode: Mode, config: LoopConfig) -> Self {
        Self {
            invoker,
            feedback,
            mode,
            config,
        }
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn invoker(&self) -> &SwitchresInvoker<R> {
        &self.invoker
    }

    /// Run a whole session starting from `start`.
    pub fn run(&mut self, start: Geometry) -> Result<SessionOutcome, CalibrationError> {
        let mut session = self.baseline(start)?;
        info!(
            mode = %self.mode,
            geometry = %session.geometry,
            crt_range = %session.range,
            "Baseline established"
        );

        loop {
            if let Some(outcome) = self.step(&mut session)? {
                return Ok(outcome);
            }
            thread::sleep(self.config.delay);
        }
    }

    /// Query switchres once without launching anything.
    ///
    /// The returned range is the session's reference. If switchres clamped
    /// `start`, the session starts from the clamped geometry.
    pub fn baseline(&mut self, start: Geometry) -> Result<Session, CalibrationError> {
        let probe = self
            .invoker
            .probe(&self.mode, &start, &mut self.feedback)
            .map_err(CalibrationError::Baseline)?;

        let echoed: Geometry = probe.geometry.parse()?;
        let mut geometry = start;
        if echoed != start {
            warn!(
                requested = %start,
                applied = %echoed,
                "Starting geometry out of CRT range bounds, using switchres' value"
            );
            self.feedback.set(&self.config.out_of_range_notice);
            geometry = echoed;
        }

        Ok(Session {
            geometry,
            range: probe.range,
        })
    }

    /// One adjustment cycle: show the working geometry and apply the answer.
    ///
    /// Returns `Some` once the operator committed or aborted.
    pub fn step(&mut self, session: &mut Session) -> Result<Option<SessionOutcome>, CalibrationError> {
        let result = self.invoker.launch(
            &self.mode,
            &session.geometry,
            &self.config.launch,
            &mut self.feedback,
        )?;
        self.feedback.clear();

        let echoed: Geometry = result.geometry.parse()?;
        if echoed != session.geometry {
            warn!(
                requested = %session.geometry,
                applied = %echoed,
                "Reached a limit, can't go further in the last direction"
            );
            self.feedback.set(&self.config.out_of_range_notice);
            session.geometry = echoed;
        }

        if result.range != session.range.refined(&result.timing) {
            warn!(
                baseline = %session.range,
                reported = %result.default_range,
                "Monitor range changed since the baseline probe"
            );
        }
        session.range = result.range;

        match engine::readjust(session.geometry, &session.range, result.exit_code) {
            Outcome::Continue(geometry) => {
                session.geometry = geometry;
                Ok(None)
            }
            Outcome::Commit { geometry, range } => {
                Ok(Some(SessionOutcome::Committed { geometry, range }))
            }
            Outcome::Abort { geometry } => Ok(Some(SessionOutcome::Aborted { geometry })),
        }
    }
}
