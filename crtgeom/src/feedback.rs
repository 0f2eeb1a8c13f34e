//! Status text shown to the operator by the launched program.
//!
//! The program switchres launches (usually `grid`) reads a text variable from
//! its environment and draws it on screen. The calibration loop writes to a
//! [`FeedbackSink`]; the invoker exports the sink's contents into the child
//! environment, so every write happens before the process that reads it is
//! spawned.

/// Environment variable `grid` reads its overlay text from.
pub const DEFAULT_FEEDBACK_VARIABLE: &str = "GRID_TEXT";

/// Text the launched program displays when a geometry had to be clamped.
pub const OUT_OF_RANGE_NOTICE: &str = "Geometry readjusted, was out of CRT range bounds";

/// Destination for operator-facing status text.
pub trait FeedbackSink {
    /// Add a line after the current text.
    fn append(&mut self, line: &str);

    /// Replace the current text.
    fn set(&mut self, text: &str);

    /// Remove all text.
    fn clear(&mut self);

    /// Current text.
    fn contents(&self) -> &str;
}

/// In-memory feedback text.
///
/// `append` always inserts a newline separator, even onto empty text, which
/// leaves an empty first line above the first annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFeedback {
    text: String,
}

impl TextFeedback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackSink for TextFeedback {
    fn append(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
    }

    fn set(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    fn clear(&mut self) {
        self.text.clear();
    }

    fn contents(&self) -> &str {
        &self.text
    }
}

impl<F: FeedbackSink + ?Sized> FeedbackSink for &mut F {
    fn append(&mut self, line: &str) {
        (**self).append(line)
    }

    fn set(&mut self, text: &str) {
        (**self).set(text)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn contents(&self) -> &str {
        (**self).contents()
    }
}
