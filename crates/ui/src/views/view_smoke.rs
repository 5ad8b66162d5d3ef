use admissions_core::model::{AcademicField, FieldName, FormSchema, WizardState, names};
use services::TransportError;

use super::test_harness::{ScriptedTransport, setup_view_harness};

const ATTACHMENT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");

fn no_reply() -> std::sync::Arc<ScriptedTransport> {
    ScriptedTransport::replying(Err(TransportError::Network("offline".into())))
}

fn completed_state(step: u8) -> WizardState {
    let schema = FormSchema::admissions();
    let mut state = WizardState::for_schema(&schema);
    for (name, value) in [
        (names::FIRST_NAME, "Ada"),
        (names::LAST_NAME, "Lovelace"),
        (names::EMAIL, "ada@example.edu"),
        (names::PHONE, "+44 20 7946 0000"),
        (names::DATE_OF_BIRTH, "1815-12-10"),
        (names::GENDER, "female"),
        (names::NATIONALITY, "British"),
        (names::COUNTRY, "United Kingdom"),
        (names::PROGRAM, "Computer Science"),
        (names::DEGREE_LEVEL, "master"),
        (names::STUDY_MODE, "full_time"),
        (names::INTAKE, "september"),
        (names::TRANSCRIPTS, ATTACHMENT),
        (names::PERSONAL_STATEMENT_FILE, ATTACHMENT),
    ] {
        state.set_field(FieldName::known(name), value);
    }
    let first = state.academic().entries()[0].ordinal();
    state
        .academic_mut()
        .update(first, AcademicField::EducationLevel, "bachelor")
        .unwrap();
    state.set_field(FieldName::known(names::DECLARATION), true);
    state.set_field(FieldName::known(names::PRIVACY), true);
    state.set_current_step(step).unwrap();
    state
}

#[tokio::test(flavor = "current_thread")]
async fn first_visit_renders_personal_step() {
    let mut harness = setup_view_harness(no_reply());
    harness.open().await;
    let html = harness.render();

    assert!(html.contains("Personal Information"), "missing title in {html}");
    assert!(html.contains("id=\"step1\""), "missing step container in {html}");
    assert!(html.contains("id=\"step5\""), "missing last step container in {html}");
    assert!(html.contains("First name"), "missing first name label in {html}");
    assert!(html.contains("0%"), "missing progress label in {html}");
    assert!(html.contains("nextBtn"), "missing next button in {html}");
    assert!(!html.contains("prevBtn"), "previous shown on step 1: {html}");
    assert!(!html.contains("submitBtn"), "submit shown on step 1: {html}");
    assert!(!html.contains("alert-info"), "unexpected notice in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn stored_draft_is_restored_with_notice() {
    let mut harness = setup_view_harness(no_reply());
    let state = completed_state(3);
    harness.drafts.save(&state).await.expect("save draft");

    harness.open().await;
    let html = harness.render();

    assert!(
        html.contains("Previous progress restored"),
        "missing restore notice in {html}"
    );
    assert!(html.contains("alert alert-info"), "missing info style in {html}");
    assert!(html.contains("50%"), "missing progress in {html}");
    assert!(html.contains("Course Selection"), "missing step title in {html}");
    assert!(html.contains("prevBtn"), "missing previous button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn academic_step_lists_every_entry() {
    let mut harness = setup_view_harness(no_reply());
    let mut state = completed_state(2);
    let second = state.academic_mut().add_entry();
    state
        .academic_mut()
        .update(second, AcademicField::Institution, "Open University")
        .unwrap();
    harness.drafts.save(&state).await.expect("save draft");

    harness.open().await;
    let html = harness.render();

    assert!(html.contains("academicEntriesContainer"), "missing container in {html}");
    assert!(html.contains("Academic Entry #1"), "missing first entry in {html}");
    assert!(html.contains("Academic Entry #2"), "missing second entry in {html}");
    assert!(html.contains("Open University"), "missing institution in {html}");
    assert!(html.contains("(2 added)"), "missing add label count in {html}");
    assert!(html.contains("Remove"), "missing remove button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn documents_step_renders_file_pickers() {
    let mut harness = setup_view_harness(no_reply());
    harness
        .drafts
        .save(&completed_state(4))
        .await
        .expect("save draft");

    harness.open().await;
    let html = harness.render();

    assert!(html.contains("Documents"), "missing step title in {html}");
    assert!(html.contains("type=\"file\""), "missing file picker in {html}");
    assert!(html.contains("attached-files"), "missing attached list in {html}");
    assert!(html.contains("Cargo.toml"), "missing attached file name in {html}");
    assert!(!html.contains(ATTACHMENT), "full path leaked into {html}");
    assert!(html.contains("startOverBtn"), "missing start over in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn last_step_shows_review_and_submit() {
    let mut harness = setup_view_harness(no_reply());
    harness
        .drafts
        .save(&completed_state(5))
        .await
        .expect("save draft");

    harness.open().await;
    let html = harness.render();

    assert!(html.contains("reviewSummary"), "missing review in {html}");
    assert!(html.contains("Lovelace"), "missing reviewed value in {html}");
    assert!(html.contains("1 academic entry provided"), "missing entry count in {html}");
    assert!(html.contains("submitBtn"), "missing submit button in {html}");
    assert!(html.contains("Submit Application"), "missing submit label in {html}");
    assert!(!html.contains("nextBtn"), "next shown on last step: {html}");
    assert!(html.contains("100%"), "missing full progress in {html}");
    assert!(harness.transport.sent().is_empty());
}
