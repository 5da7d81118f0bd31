//! Scripted sessions
//!
//! A script is a YAML list of steps replayed against a fresh session:
//!
//! ```yaml
//! description: adult starter
//! steps:
//!   - action: submit
//!     answers:
//!       Registration Code: REG-001
//!       Age Group: "31–40"
//!       Gender: Female
//!       KK Number: "2"
//!   - action: back
//! ```
//!
//! A `submit` step targets the current stage unless it names one with `stage`.

use crate::driver::{Action, AnswerSource, DriverError, Event};
use readiness_core::{Session, Stage, StageAnswers, Submission};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;

/// One scripted action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Submit answers
    Submit {
        /// Stage the answers are for, defaults to the current one
        #[serde(default)]
        stage: Option<Stage>,
        /// Selections
        answers: StageAnswers,
    },
    /// Navigate back
    Back,
    /// Start over
    Reset,
}

/// Parsed script
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Free-form label
    #[serde(default)]
    pub description: Option<String>,
    /// Steps in order
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse YAML text
    ///
    /// # Errors
    /// [`DriverError::ScriptFormat`] when the YAML does not describe a script.
    pub fn from_yaml(text: &str) -> Result<Self, DriverError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a script file
    ///
    /// # Errors
    /// [`DriverError::Io`] or [`DriverError::ScriptFormat`].
    pub fn load(path: &Path) -> Result<Self, DriverError> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }
}

/// [`AnswerSource`] that replays a [`Script`]
#[derive(Debug)]
pub struct ScriptSource {
    steps: VecDeque<Step>,
    position: usize,
    strict: bool,
}

impl ScriptSource {
    /// Replay `script`, tolerating rejected steps
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            steps: script.steps.into(),
            position: 0,
            strict: false,
        }
    }

    /// Abort on the first rejected step
    #[inline]
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl AnswerSource for ScriptSource {
    fn next_action(&mut self, session: &Session) -> Result<Action, DriverError> {
        let Some(step) = self.steps.pop_front() else {
            return Ok(Action::Quit);
        };
        self.position += 1;
        tracing::debug!("Script step {} on stage {}", self.position, session.stage());

        Ok(match step {
            Step::Submit { stage, answers } => {
                Action::Submit(Submission::new(stage.unwrap_or(session.stage()), answers))
            }
            Step::Back => Action::Back,
            Step::Reset => Action::Reset,
        })
    }

    fn notify(&mut self, event: &Event<'_>) -> Result<(), DriverError> {
        match event {
            Event::Rejected(e) if self.strict => Err(DriverError::StepRejected {
                step: self.position,
                message: e.to_string(),
            }),
            Event::Rejected(e) => {
                tracing::warn!("Script step {} rejected: {}", self.position, e);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
