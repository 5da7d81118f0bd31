//! [`ReportRenderer`] backed by the PDF encoder

use crate::{layout, pdf};
use chrono::{Local, NaiveDateTime};
use readiness_core::{AnswerRecord, Classification, DocumentArtifact, RenderError, ReportRenderer};

/// MIME type of rendered reports
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Renders the assessment report as an A4 PDF
#[derive(Debug, Clone, Default)]
pub struct PdfReportRenderer {
    fixed_time: Option<NaiveDateTime>,
}

impl PdfReportRenderer {
    /// Renderer stamping reports with the local time
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every report with `at` instead of the current time
    #[inline]
    #[must_use]
    pub fn with_fixed_time(mut self, at: NaiveDateTime) -> Self {
        self.fixed_time = Some(at);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.fixed_time
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(
        &self,
        record: &AnswerRecord,
        classification: Classification,
    ) -> Result<DocumentArtifact, RenderError> {
        let report = layout::compose(record, classification, self.now())?;
        let bytes = pdf::encode(&report)?;
        tracing::debug!(
            "Rendered {} report with {} sections",
            classification,
            report.sections.len()
        );
        Ok(DocumentArtifact::new(bytes, report.filename, PDF_CONTENT_TYPE))
    }
}
