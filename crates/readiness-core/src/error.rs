//! Error types for the wizard
//!
//! - [`ValidationError`]: recoverable, the stage does not advance
//! - [`ResolveError`]: the session is in a state the transition table does not cover
//! - [`RenderError`] / [`PersistenceError`]: collaborator failures at the terminal stage
//! - [`WizardError`]: everything the controller can return

use crate::session::SessionId;
use crate::stage::{Classification, Stage};

/// Main wizard error type
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// Stage answers failed the gate
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No transition exists for the current state
    #[error("transition failed: {0}")]
    Transition(#[from] ResolveError),

    /// Submission was produced for a different stage than the current one
    #[error("stale submission for stage {submitted}, session is on stage {current}")]
    StaleSubmission {
        /// Stage the session is on
        current: Stage,
        /// Stage named by the submission
        submitted: Stage,
    },

    /// The session reached the terminal stage; only reset is allowed
    #[error("session already finalized")]
    SessionFinalized,

    /// Operation needs the terminal stage
    #[error("session has not reached the terminal stage (on {0})")]
    NotFinished(Stage),

    /// Report regeneration failed
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// No session registered under this id
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
}

impl WizardError {
    /// Whether the respondent can correct the input and retry
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::StaleSubmission { .. } | Self::Render(_)
        )
    }
}

/// Gate failure: which questions still need an answer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stage {stage}: {} unanswered, {} invalid", .missing.len(), .invalid.len())]
pub struct ValidationError {
    /// Stage that was checked
    pub stage: Stage,
    /// Keys absent or still at their sentinel, in display order
    pub missing: Vec<String>,
    /// Keys whose value is not one of the question's options
    pub invalid: Vec<String>,
}

impl ValidationError {
    /// Every offending key, missing first
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().chain(self.invalid.iter()).map(String::as_str)
    }
}

/// Transition table violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The terminal stage has no forward transition
    #[error("no forward transition from the terminal stage")]
    Terminal,

    /// Session classification does not match the branch the stage belongs to
    #[error("stage {stage} requires classification {required}, session is {actual}")]
    ClassificationMismatch {
        /// Current stage
        stage: Stage,
        /// Classification the stage belongs to
        required: Classification,
        /// Classification carried by the session
        actual: Classification,
    },

    /// A routing answer is missing or outside its option list
    #[error("unexpected answer for {key}: {value:?}")]
    UnexpectedAnswer {
        /// Routing question key
        key: String,
        /// Value received
        value: Option<String>,
    },
}

/// Report generation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Renderer was invoked before classification was derived
    #[error("cannot render a report for an unclassified session")]
    Unclassified,

    /// A field the template needs is absent from the record
    #[error("record is missing field: {0}")]
    MissingField(String),

    /// Document encoding failed
    #[error("document encoding failed: {0}")]
    Encoding(String),
}

/// Persistence sink failures
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure
    #[error("{backend} sink failed: {message}")]
    Backend {
        /// Backend name
        backend: &'static str,
        /// Failure description
        message: String,
    },

    /// Sink refused the record
    #[error("record rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_counts_keys() {
        let err = ValidationError {
            stage: Stage::Basics,
            missing: vec!["Gender".into(), "KK Number".into()],
            invalid: vec!["Age Group".into()],
        };
        assert_eq!(err.to_string(), "stage 1: 2 unanswered, 1 invalid");
        assert_eq!(err.keys().collect::<Vec<_>>(), ["Gender", "KK Number", "Age Group"]);
    }

    #[test]
    fn wizard_error_recoverability() {
        let validation = WizardError::from(ValidationError {
            stage: Stage::OwnershipGate,
            missing: vec!["Running Business".into()],
            invalid: vec![],
        });
        assert!(validation.is_recoverable());
        assert!(!WizardError::SessionFinalized.is_recoverable());
        assert!(!WizardError::from(ResolveError::Terminal).is_recoverable());
    }

    #[test]
    fn persistence_error_wraps_io() {
        let err = PersistenceError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(err.to_string().contains("disk full"));
    }
}
