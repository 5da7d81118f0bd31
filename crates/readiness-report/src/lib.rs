//! Readiness Report - PDF rendering for finished assessments
//!
//! [`PdfReportRenderer`] implements the core [`ReportRenderer`] boundary:
//! - [`layout`]: per-branch templates composed into a [`ReportDocument`]
//! - [`pdf`]: paginated A4 encoding via `lopdf`
//!
//! [`ReportRenderer`]: readiness_core::ReportRenderer

pub mod layout;
pub mod pdf;
pub mod renderer;

pub use layout::{compose, template, Block, ReportDocument, Section, Template, REPORT_TITLE};
pub use renderer::{PdfReportRenderer, PDF_CONTENT_TYPE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
