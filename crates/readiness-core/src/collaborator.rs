//! Collaborator boundaries
//!
//! The controller hands a finalized record to a [`ReportRenderer`] and a
//! [`PersistenceSink`]. Concrete adapters live in `readiness-report` and
//! `readiness-sink`.

use crate::error::{PersistenceError, RenderError};
use crate::record::AnswerRecord;
use crate::stage::Classification;

/// Generated report ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArtifact {
    /// Encoded document
    pub bytes: Vec<u8>,
    /// Suggested file name
    pub filename: String,
    /// MIME type
    pub content_type: String,
}

impl DocumentArtifact {
    /// Create a new artifact
    #[inline]
    #[must_use]
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    /// Encoded size in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Turns a finalized record into a document
///
/// Implementations select only the fields relevant to `classification` plus
/// the stage 1 basics.
#[cfg_attr(test, mockall::automock)]
pub trait ReportRenderer: Send + Sync {
    /// Render the report
    ///
    /// # Errors
    /// Returns [`RenderError`] when the record lacks a required field or
    /// encoding fails.
    fn render(
        &self,
        record: &AnswerRecord,
        classification: Classification,
    ) -> Result<DocumentArtifact, RenderError>;
}

/// Durable append-only destination for finalized records
#[cfg_attr(test, mockall::automock)]
pub trait PersistenceSink: Send + Sync {
    /// Append one flattened row for `record`
    ///
    /// # Errors
    /// Returns [`PersistenceError`] when the backend rejects or fails the write.
    fn append(&self, record: &AnswerRecord) -> Result<(), PersistenceError>;
}

impl<T: ReportRenderer + ?Sized> ReportRenderer for Box<T> {
    fn render(
        &self,
        record: &AnswerRecord,
        classification: Classification,
    ) -> Result<DocumentArtifact, RenderError> {
        (**self).render(record, classification)
    }
}

impl<T: PersistenceSink + ?Sized> PersistenceSink for Box<T> {
    fn append(&self, record: &AnswerRecord) -> Result<(), PersistenceError> {
        (**self).append(record)
    }
}
