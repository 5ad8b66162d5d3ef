use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;

use admissions_core::model::{AcademicField, FieldName, names};
use admissions_core::time::fixed_now;
use services::wizard::{NETWORK_ERROR_MESSAGE, RESTORED_MESSAGE};
use services::{
    AppServices, Clock, DRAFT_KEY, DraftStore, NavOutcome, NoticeKind, StepStatus, SubmissionClient,
    SubmissionPayload, SubmissionResponse, SubmissionTransport, SubmitError, SubmitPhase,
    TransportError, WizardSession,
};
use storage::repository::Storage;

#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<SubmissionResponse, TransportError>>>,
    sent: Mutex<Vec<SubmissionPayload>>,
}

impl ScriptedTransport {
    fn replying(reply: Result<SubmissionResponse, TransportError>) -> Arc<Self> {
        let transport = Self::default();
        transport.replies.lock().unwrap().push_back(reply);
        Arc::new(transport)
    }

    fn sent(&self) -> Vec<SubmissionPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionTransport for ScriptedTransport {
    async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionResponse, TransportError> {
        self.sent.lock().unwrap().push(payload.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())))
    }
}

fn accepted(id: &str) -> Result<SubmissionResponse, TransportError> {
    Ok(SubmissionResponse {
        success: true,
        application_id: Some(id.to_string()),
        ..SubmissionResponse::default()
    })
}

const ATTACHMENT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");

fn set(session: &mut WizardSession, name: &'static str, value: &str) {
    assert!(session.set_field(FieldName::known(name), value));
}

fn fill_everything(session: &mut WizardSession) {
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
        set(session, name, value);
    }
    let ordinal = session.controller().state().academic().entries()[0].ordinal();
    session
        .update_entry(ordinal, AcademicField::EducationLevel, "bachelor")
        .unwrap();
    session.set_field(FieldName::known(names::DECLARATION), true);
    session.set_field(FieldName::known(names::PRIVACY), true);
}

#[tokio::test]
async fn happy_path_submits_and_clears_draft() {
    let transport = ScriptedTransport::replying(accepted("APP-0001"));
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), transport.clone());
    let workflow = services.workflow();

    let mut session = workflow.start().await;
    assert!(session.notice().is_none());
    fill_everything(&mut session);

    assert_eq!(
        workflow.go_next(&mut session).await,
        NavOutcome::Moved { from: 1, to: 2 }
    );
    assert_eq!(session.view().progress_label, 25);
    assert!(services.drafts().load().await.is_some());

    while workflow.go_next(&mut session).await.moved() {}
    assert_eq!(session.controller().current_step(), 5);
    assert!(session.view().show_submit);

    let receipt = workflow.submit(&mut session).await.expect("submit");
    assert_eq!(receipt.application_id.as_str(), "APP-0001");
    assert!(matches!(session.phase(), SubmitPhase::Submitted(_)));
    assert!(services.drafts().load().await.is_none());

    let view = session.view();
    assert!(view.submitted);
    assert_eq!(view.progress_label, 100);
    assert!(view.indicators.iter().all(|i| i.status == StepStatus::Completed));
    assert!(!view.show_prev && !view.show_next && !view.show_submit);
    assert_eq!(session.notice().map(|n| n.kind), Some(NoticeKind::Success));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].values("educationLevel[]"), vec!["bachelor"]);
    assert_eq!(sent[0].values(names::PRIVACY), vec!["on"]);
    assert_eq!(sent[0].attachments().len(), 2);

    assert!(matches!(
        workflow.submit(&mut session).await,
        Err(SubmitError::AlreadySubmitted)
    ));
}

#[tokio::test]
async fn server_rejection_keeps_state_and_reenables_submit() {
    let transport = ScriptedTransport::replying(Ok(SubmissionResponse {
        success: false,
        error: Some("duplicate email".to_string()),
        ..SubmissionResponse::default()
    }));
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), transport);
    let workflow = services.workflow();
    let mut session = workflow.start().await;
    fill_everything(&mut session);
    session.jump_to(5);
    let before = session.controller().state().clone();

    let err = workflow.submit(&mut session).await.unwrap_err();
    assert_eq!(err.user_message(), "duplicate email");
    assert_eq!(
        session.phase(),
        &SubmitPhase::Idle {
            last_error: Some("duplicate email".to_string())
        }
    );
    assert!(!session.submit_disabled());
    assert_eq!(session.submit_label(), "Submit Application");
    assert_eq!(session.controller().state(), &before);
    assert_eq!(
        session.notice().map(|n| n.message.as_str()),
        Some("duplicate email")
    );
}

#[tokio::test]
async fn network_failure_surfaces_connection_message() {
    let transport = ScriptedTransport::replying(Err(TransportError::Network(
        "connection refused".into(),
    )));
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), transport);
    let workflow = services.workflow();
    let mut session = workflow.start().await;
    fill_everything(&mut session);

    assert!(matches!(
        workflow.submit(&mut session).await,
        Err(SubmitError::Transport(_))
    ));
    assert_eq!(
        session.notice().map(|n| n.message.as_str()),
        Some(NETWORK_ERROR_MESSAGE)
    );
    assert_eq!(session.controller().current_step(), 1);
}

#[tokio::test]
async fn in_flight_submission_freezes_the_form() {
    let transport = ScriptedTransport::replying(accepted("APP-0002"));
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), transport.clone());
    let workflow = services.workflow();
    let mut session = workflow.start().await;
    fill_everything(&mut session);
    workflow.go_next(&mut session).await;
    let draft = services.drafts().load().await.expect("draft saved");

    let payload = session.begin_submission().expect("begin");
    assert!(session.submit_disabled());
    assert_eq!(session.submit_label(), "Submitting...");
    assert!(matches!(
        workflow.submit(&mut session).await,
        Err(SubmitError::InFlight)
    ));
    assert!(matches!(
        workflow.start_over(&mut session).await,
        Err(SubmitError::InFlight)
    ));
    assert_eq!(workflow.go_next(&mut session).await, NavOutcome::Unchanged);
    assert!(!session.set_field(FieldName::known(names::FIRST_NAME), "Changed"));
    assert!(transport.sent().is_empty());
    assert_eq!(services.drafts().load().await, Some(draft));

    let receipt = workflow.settle(&mut session, &payload).await.expect("settled");
    assert_eq!(receipt.application_id.as_str(), "APP-0002");
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(transport.sent()[0].values(names::FIRST_NAME), vec!["Ada"]);
    assert_eq!(
        session
            .controller()
            .state()
            .text(&FieldName::known(names::FIRST_NAME)),
        "Ada"
    );
    assert!(session.receipt().is_some());
    assert!(services.drafts().load().await.is_none());
}

#[tokio::test]
async fn invalid_form_is_not_sent() {
    let transport = ScriptedTransport::replying(accepted("APP-0003"));
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), transport.clone());
    let workflow = services.workflow();
    let mut session = workflow.start().await;
    fill_everything(&mut session);
    set(&mut session, names::TRANSCRIPTS, "");
    session.jump_to(3);

    let err = workflow.submit(&mut session).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation {
            first_invalid_step: 4,
            ..
        }
    ));
    assert_eq!(session.controller().current_step(), 3);
    assert!(transport.sent().is_empty());
    assert_eq!(session.phase().button_label(), "Submit Application");
}

#[tokio::test]
async fn draft_restores_within_ttl_and_expires_after() {
    let storage = Storage::in_memory();
    let transport = ScriptedTransport::replying(accepted("unused"));
    let mut clock = Clock::fixed(fixed_now());

    let services = AppServices::assemble(
        &storage,
        clock,
        SubmissionClient::new(transport.clone()),
    );
    let workflow = services.workflow();
    let mut session = workflow.start().await;
    fill_everything(&mut session);
    session.add_entry().unwrap();
    workflow.go_next(&mut session).await;
    workflow.go_next(&mut session).await;
    assert_eq!(session.controller().current_step(), 3);

    clock.advance(Duration::hours(23));
    let services = AppServices::assemble(
        &storage,
        clock,
        SubmissionClient::new(transport.clone()),
    );
    let restored = services.workflow().start().await;
    assert_eq!(restored.controller().current_step(), 3);
    assert_eq!(restored.controller().state().repeating_section_count(), 2);
    assert_eq!(
        restored
            .controller()
            .state()
            .text(&FieldName::known(names::EMAIL)),
        "ada@example.edu"
    );
    assert_eq!(
        restored.notice().map(|n| n.message.as_str()),
        Some(RESTORED_MESSAGE)
    );

    clock.advance(Duration::hours(2));
    let services = AppServices::assemble(&storage, clock, SubmissionClient::new(transport));
    let fresh = services.workflow().start().await;
    assert_eq!(fresh.controller().current_step(), 1);
    assert!(fresh.notice().is_none());
    assert_eq!(storage.drafts.get(DRAFT_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn start_over_discards_draft() {
    let storage = Storage::in_memory();
    let drafts = DraftStore::new(Clock::fixed(fixed_now()), Arc::clone(&storage.drafts));
    let services = AppServices::assemble(
        &storage,
        Clock::fixed(fixed_now()),
        SubmissionClient::new(ScriptedTransport::replying(accepted("x"))),
    );
    let workflow = services.workflow();
    let mut session = workflow.start().await;
    fill_everything(&mut session);
    workflow.go_next(&mut session).await;
    assert!(drafts.load().await.is_some());

    workflow.start_over(&mut session).await.expect("idle form resets");
    assert_eq!(session.controller().current_step(), 1);
    assert!(session.controller().state().text(&FieldName::known(names::EMAIL)).is_empty());
    assert!(drafts.load().await.is_none());
}
