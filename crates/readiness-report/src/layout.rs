//! Report layout
//!
//! A report is composed in two steps: [`compose`] turns the record into a
//! [`ReportDocument`] using the per-branch [`Template`], then the PDF encoder
//! draws it. Templates are data; adding a branch means adding a template.

use chrono::NaiveDateTime;
use readiness_core::catalog::{self, QuestionSet};
use readiness_core::{AnswerRecord, Classification, RenderError, Stage};

/// Document title
pub const REPORT_TITLE: &str = "Business Personality & Readiness Report";

const BASICS_HEADING: &str = "Stage 1 – Personal Information";
const GENERATED_FORMAT: &str = "%d %B %Y, %I:%M %p";
const FILENAME_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// How a stage's answers are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// One `label: answer` line per question
    Fields,
    /// Two-column table with the given column headers
    Table(&'static str, &'static str),
}

/// One classification-specific block
#[derive(Debug, Clone, Copy)]
pub struct Part {
    /// Section heading
    pub heading: &'static str,
    /// Stage whose questions are listed
    pub stage: Stage,
    /// Layout
    pub style: Style,
}

/// Report template for one branch
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// Branch this template renders
    pub classification: Classification,
    /// Filename stem, the timestamp is appended
    pub filename_prefix: &'static str,
    /// Branch-specific sections after the basics
    pub parts: &'static [Part],
    /// Closing note
    pub note: &'static str,
}

static FUTURE: Template = Template {
    classification: Classification::Future,
    filename_prefix: "Future_Entrepreneur_Report",
    parts: &[Part {
        heading: "Future Entrepreneur Assessment",
        stage: Stage::FutureAssessment,
        style: Style::Fields,
    }],
    note: "This assessment is an introductory guidance for young entrepreneurs. \
           Parents/guardians should supervise and support execution of plans.",
};

static STARTER: Template = Template {
    classification: Classification::Starter,
    filename_prefix: "Starter_Report",
    parts: &[Part {
        heading: "New Business Starter Assessment",
        stage: Stage::StarterAssessment,
        style: Style::Fields,
    }],
    note: "This assessment helps you plan initial steps to start your business. \
           Consider mentorship and training to improve your readiness.",
};

static OWNER: Template = Template {
    classification: Classification::Owner,
    filename_prefix: "Business_Readiness_Report",
    parts: &[
        Part {
            heading: "Stage 2 – Personality & Lifestyle",
            stage: Stage::OwnerProfile,
            style: Style::Fields,
        },
        Part {
            heading: "Stage 3 – Mandatory Requirements",
            stage: Stage::OwnerCompliance,
            style: Style::Table("Requirement", "Status"),
        },
    ],
    note: "To proceed further, the firm must ensure that all the listed requirements \
           are fully implemented. Once all conditions are satisfied, a verification visit \
           will be conducted by our team to validate completion and compliance.",
};

/// Template for `classification`, `None` while unclassified
#[must_use]
pub fn template(classification: Classification) -> Option<&'static Template> {
    match classification {
        Classification::Future => Some(&FUTURE),
        Classification::Starter => Some(&STARTER),
        Classification::Owner => Some(&OWNER),
        Classification::Unclassified => None,
    }
}

/// Body of a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Labelled answers
    Fields(Vec<(String, String)>),
    /// Header row plus data rows
    Table {
        /// Column headers
        header: [String; 2],
        /// Data rows
        rows: Vec<[String; 2]>,
    },
    /// Highlighted closing note
    Note(String),
}

/// A headed (or unheaded) block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading, `None` for the note
    pub heading: Option<String>,
    /// Content
    pub block: Block,
}

/// Fully resolved report content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    /// Title line
    pub title: String,
    /// "Generated on ..." line
    pub generated: String,
    /// Sections in print order
    pub sections: Vec<Section>,
    /// Suggested download name
    pub filename: String,
}

/// Lay out the report for `record` as of `at`.
///
/// # Errors
/// - [`RenderError::Unclassified`] when `classification` is unset
/// - [`RenderError::MissingField`] when a field the template lists is absent
pub fn compose(
    record: &AnswerRecord,
    classification: Classification,
    at: NaiveDateTime,
) -> Result<ReportDocument, RenderError> {
    let template = template(classification).ok_or(RenderError::Unclassified)?;

    let mut sections = Vec::with_capacity(template.parts.len() + 2);
    sections.push(Section {
        heading: Some(BASICS_HEADING.to_string()),
        block: fields(record, stage_set(Stage::Basics)?)?,
    });

    for part in template.parts {
        let set = stage_set(part.stage)?;
        let block = match part.style {
            Style::Fields => fields(record, set)?,
            Style::Table(left, right) => table(record, set, [left, right])?,
        };
        sections.push(Section {
            heading: Some(part.heading.to_string()),
            block,
        });
    }

    sections.push(Section {
        heading: None,
        block: Block::Note(template.note.to_string()),
    });

    Ok(ReportDocument {
        title: REPORT_TITLE.to_string(),
        generated: format!("Generated on {}", at.format(GENERATED_FORMAT)),
        sections,
        filename: format!(
            "{}_{}.pdf",
            template.filename_prefix,
            at.format(FILENAME_TIMESTAMP)
        ),
    })
}

fn stage_set(stage: Stage) -> Result<&'static QuestionSet, RenderError> {
    catalog::question_set(stage)
        .ok_or_else(|| RenderError::Encoding(format!("no question set for stage {stage}")))
}

fn answer(record: &AnswerRecord, key: &str) -> Result<String, RenderError> {
    record
        .get(key)
        .map(str::to_string)
        .ok_or_else(|| RenderError::MissingField(key.to_string()))
}

fn fields(record: &AnswerRecord, set: &QuestionSet) -> Result<Block, RenderError> {
    set.questions
        .iter()
        .map(|q| -> Result<_, RenderError> { Ok((q.label.to_string(), answer(record, q.key)?)) })
        .collect::<Result<Vec<_>, _>>()
        .map(Block::Fields)
}

fn table(record: &AnswerRecord, set: &QuestionSet, header: [&str; 2]) -> Result<Block, RenderError> {
    let rows = set
        .questions
        .iter()
        .map(|q| -> Result<_, RenderError> { Ok([q.label.to_string(), answer(record, q.key)?]) })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Block::Table {
        header: header.map(str::to_string),
        rows,
    })
}
