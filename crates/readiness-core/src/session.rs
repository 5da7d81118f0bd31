//! Per-respondent session state
//!
//! Everything the wizard knows about one respondent lives in a [`Session`].
//! The controller borrows it mutably for each operation; nothing is global.

use crate::catalog::{self, QuestionSet};
use crate::collaborator::DocumentArtifact;
use crate::record::{AnswerRecord, StageAnswers};
use crate::stage::{Classification, Stage};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique session identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Generate new session ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stage's worth of answers, tagged with the stage they were filled in on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Stage the form was shown for
    pub stage: Stage,
    /// Selections as submitted
    pub answers: StageAnswers,
}

impl Submission {
    /// Create a submission
    #[inline]
    #[must_use]
    pub fn new(stage: Stage, answers: StageAnswers) -> Self {
        Self { stage, answers }
    }
}

/// Wizard state for one respondent
#[derive(Debug, Clone, Default)]
pub struct Session {
    stage: Stage,
    history: Vec<Stage>,
    classification: Classification,
    record: AnswerRecord,
    submitted: bool,
    artifact: Option<DocumentArtifact>,
}

impl Session {
    /// Fresh session on stage 1
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage
    #[inline]
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current classification
    #[inline]
    #[must_use]
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Accumulated answers
    #[inline]
    #[must_use]
    pub fn record(&self) -> &AnswerRecord {
        &self.record
    }

    /// Stages visited before the current one, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Whether the record was handed to the sink for this terminal arrival
    #[inline]
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Question set for the current stage, `None` on the terminal stage
    #[inline]
    #[must_use]
    pub fn question_set(&self) -> Option<&'static QuestionSet> {
        catalog::question_set(self.stage)
    }

    /// Whether an artifact is waiting to be retrieved
    #[inline]
    #[must_use]
    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    /// Generated report still waiting to be retrieved
    #[inline]
    #[must_use]
    pub fn artifact(&self) -> Option<&DocumentArtifact> {
        self.artifact.as_ref()
    }

    /// Retrieve the generated report; yields it once per terminal arrival
    #[inline]
    pub fn take_artifact(&mut self) -> Option<DocumentArtifact> {
        self.artifact.take()
    }

    /// Path actually traversed, including the current stage
    pub fn path(&self) -> impl Iterator<Item = Stage> + '_ {
        self.history.iter().copied().chain(std::iter::once(self.stage))
    }

    pub(crate) fn advance_to(&mut self, next: Stage, classification: Classification) {
        self.history.push(self.stage);
        self.stage = next;
        self.classification = classification;
    }

    pub(crate) fn step_back(&mut self) -> Option<Stage> {
        let previous = self.history.pop()?;
        self.stage = previous;
        Some(previous)
    }

    pub(crate) fn record_mut(&mut self) -> &mut AnswerRecord {
        &mut self.record
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    pub(crate) fn store_artifact(&mut self, artifact: DocumentArtifact) {
        self.artifact = Some(artifact);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}
