use chrono::NaiveDate;
use lopdf::Document;
use pretty_assertions::assert_eq;
use readiness_core::catalog::question_set;
use readiness_core::prelude::*;
use readiness_core::RenderError;
use readiness_report::{PdfReportRenderer, PDF_CONTENT_TYPE};
use readiness_test_utils::{basics, complete, ownership, RecordingSink};

fn renderer() -> PdfReportRenderer {
    let at = NaiveDate::from_ymd_opt(2025, 11, 2)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .unwrap();
    PdfReportRenderer::new().with_fixed_time(at)
}

#[test]
fn owner_session_produces_downloadable_pdf() {
    let wizard = WizardController::new(renderer(), RecordingSink::new());
    let mut session = Session::new();
    wizard.advance(&mut session, &basics("REG-77", "41–50")).unwrap();
    wizard.advance(&mut session, &ownership(true)).unwrap();
    wizard
        .advance(&mut session, &complete(Stage::OwnerProfile))
        .unwrap();
    let outcome = wizard
        .advance(&mut session, &complete(Stage::OwnerCompliance))
        .unwrap();
    assert_eq!(outcome.stage(), Stage::Complete);

    let artifact = session.take_artifact().unwrap();
    assert_eq!(artifact.filename, "Business_Readiness_Report_20251102_083000.pdf");
    assert_eq!(artifact.content_type, PDF_CONTENT_TYPE);
    assert!(artifact.bytes.starts_with(b"%PDF-"));

    let doc = Document::load_mem(&artifact.bytes).unwrap();
    assert!(!doc.get_pages().is_empty());
}

#[test]
fn future_and_starter_filenames_follow_branch() {
    let r = renderer();
    let mut record = AnswerRecord::new();
    record.merge(&basics("REG-1", "Below 18").answers);
    record.merge(&complete(Stage::FutureAssessment).answers);
    let artifact = r.render(&record, Classification::Future).unwrap();
    assert_eq!(artifact.filename, "Future_Entrepreneur_Report_20251102_083000.pdf");

    record.merge(&complete(Stage::StarterAssessment).answers);
    let artifact = r.render(&record, Classification::Starter).unwrap();
    assert_eq!(artifact.filename, "Starter_Report_20251102_083000.pdf");
}

#[test]
fn incomplete_record_is_a_render_error() {
    let mut record = AnswerRecord::new();
    record.merge(&basics("REG-2", "20–30").answers);
    let missing = question_set(Stage::StarterAssessment)
        .unwrap()
        .questions[0]
        .key;

    assert_eq!(
        renderer().render(&record, Classification::Starter),
        Err(RenderError::MissingField(missing.to_string()))
    );
    assert_eq!(
        renderer().render(&record, Classification::Unclassified),
        Err(RenderError::Unclassified)
    );
}
