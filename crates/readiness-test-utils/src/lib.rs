//! Testing utilities for the readiness workspace
//!
//! Recording collaborators and answer fixtures.

#![allow(missing_docs)]

use parking_lot::Mutex;
use readiness_core::catalog::{self, Input};
use readiness_core::{
    AnswerRecord, Classification, DocumentArtifact, PersistenceError, PersistenceSink,
    RenderError, ReportRenderer, Stage, StageAnswers, Submission,
};
use std::sync::Arc;

/// Sink that keeps every appended record; clones share storage
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    appended: Arc<Mutex<Vec<AnswerRecord>>>,
    fail_with: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that counts calls but rejects every record
    pub fn failing(reason: &str) -> Self {
        Self {
            appended: Arc::default(),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn appended(&self) -> Vec<AnswerRecord> {
        self.appended.lock().clone()
    }

    pub fn append_count(&self) -> usize {
        self.appended.lock().len()
    }
}

impl PersistenceSink for RecordingSink {
    fn append(&self, record: &AnswerRecord) -> Result<(), PersistenceError> {
        self.appended.lock().push(record.clone());
        match &self.fail_with {
            Some(reason) => Err(PersistenceError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

/// Renderer that records its inputs and returns a stub PDF
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<(AnswerRecord, Classification)>>>,
    fail_with: Option<RenderError>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: RenderError) -> Self {
        Self {
            calls: Arc::default(),
            fail_with: Some(error),
        }
    }

    pub fn calls(&self) -> Vec<(AnswerRecord, Classification)> {
        self.calls.lock().clone()
    }

    pub fn render_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl ReportRenderer for RecordingRenderer {
    fn render(
        &self,
        record: &AnswerRecord,
        classification: Classification,
    ) -> Result<DocumentArtifact, RenderError> {
        self.calls.lock().push((record.clone(), classification));
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(DocumentArtifact::new(
                b"%PDF-1.5 stub".to_vec(),
                format!("{classification}_report.pdf"),
                "application/pdf",
            )),
        }
    }
}

/// Every question on `stage` answered with its first option
pub fn complete_answers(stage: Stage) -> StageAnswers {
    catalog::question_set(stage)
        .map(|set| {
            set.questions
                .iter()
                .map(|q| match q.input {
                    Input::Choice { options, .. } => (q.key, options[0]),
                    Input::Text => (q.key, "REG-0001"),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Every question on `stage` answered with `value`
pub fn uniform_answers(stage: Stage, value: &str) -> StageAnswers {
    catalog::question_set(stage)
        .map(|set| set.keys().map(|key| (key, value)).collect())
        .unwrap_or_default()
}

/// Stage 1 answers with the given age group
pub fn basics(code: &str, age_group: &str) -> Submission {
    Submission::new(
        Stage::Basics,
        StageAnswers::new()
            .with("Registration Code", code)
            .with(catalog::AGE_GROUP_KEY, age_group)
            .with("Gender", "Female")
            .with("KK Number", "4"),
    )
}

/// Stage 1.5 answer
pub fn ownership(running_business: bool) -> Submission {
    let answer = if running_business { catalog::YES } else { catalog::NO };
    Submission::new(
        Stage::OwnershipGate,
        StageAnswers::new().with(catalog::OWNERSHIP_KEY, answer),
    )
}

/// Complete submission for `stage`
pub fn complete(stage: Stage) -> Submission {
    Submission::new(stage, complete_answers(stage))
}
