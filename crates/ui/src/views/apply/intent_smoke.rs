use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use admissions_core::model::{
    AcademicField, FieldName, FieldValue, FormSchema, WizardState, names,
};
use admissions_core::time::fixed_now;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{
    AppServices, Clock, DraftStore, NoticeKind, SubmissionResponse, SubmitPhase, TransportError,
    WizardSession,
};

use crate::views::test_harness::ScriptedTransport;

use super::actions::{ApplyIntent, use_apply_dispatcher};
use super::state::{ApplyServices, ApplyState, use_apply_state};

#[derive(Clone, Default)]
struct HarnessHandles {
    dispatch: Rc<RefCell<Option<Callback<ApplyIntent>>>>,
    state: Rc<RefCell<Option<ApplyState>>>,
}

impl HarnessHandles {
    fn dispatch(&self) -> Callback<ApplyIntent> {
        self.dispatch.borrow().expect("dispatch registered")
    }

    fn state(&self) -> ApplyState {
        self.state.borrow().expect("state registered")
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    services: ApplyServices,
    handles: HarnessHandles,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ApplyIntentHarness(props: HarnessProps) -> Element {
    let state = use_apply_state(&props.services);
    let dispatch = use_apply_dispatcher(&state, &props.services);
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *props.handles.dispatch.borrow_mut() = Some(dispatch);
        *props.handles.state.borrow_mut() = Some(state);
    }
    rsx! { div {} }
}

struct Harness {
    dom: VirtualDom,
    handles: HarnessHandles,
    drafts: Arc<DraftStore>,
    transport: Arc<ScriptedTransport>,
}

impl Harness {
    async fn open(transport: Arc<ScriptedTransport>, draft: Option<WizardState>) -> Self {
        let services = AppServices::in_memory(Clock::fixed(fixed_now()), transport.clone());
        let drafts = services.drafts();
        if let Some(state) = draft {
            drafts.save(&state).await.expect("seed draft");
        }
        let handles = HarnessHandles::default();
        let mut dom = VirtualDom::new_with_props(
            ApplyIntentHarness,
            HarnessProps {
                services: ApplyServices {
                    workflow: services.workflow(),
                },
                handles: handles.clone(),
            },
        );
        dom.rebuild_in_place();
        let mut harness = Self {
            dom,
            handles,
            drafts,
            transport,
        };
        harness.settle().await;
        harness
    }

    fn send(&mut self, intent: ApplyIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        self.dom.process_events();
        self.dom.render_immediate(&mut NoOpMutations);
    }

    async fn settle(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    fn session<R>(&self, read: impl FnOnce(&WizardSession) -> R) -> R {
        let state = self.handles.state();
        self.dom.in_runtime(|| {
            let guard = state.session.peek();
            read(guard.as_ref().expect("session opened"))
        })
    }
}

fn offline() -> Arc<ScriptedTransport> {
    ScriptedTransport::replying(Err(TransportError::Network("offline".into())))
}

fn personal_details() -> [(&'static str, &'static str); 8] {
    [
        (names::FIRST_NAME, "Ada"),
        (names::LAST_NAME, "Lovelace"),
        (names::EMAIL, "ada@example.edu"),
        (names::PHONE, "+44 20 7946 0000"),
        (names::DATE_OF_BIRTH, "1815-12-10"),
        (names::GENDER, "female"),
        (names::NATIONALITY, "British"),
        (names::COUNTRY, "United Kingdom"),
    ]
}

const ATTACHMENT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");

fn ready_to_submit(step: u8) -> WizardState {
    let mut state = WizardState::for_schema(&FormSchema::admissions());
    for (name, value) in personal_details() {
        state.set_field(FieldName::known(name), value);
    }
    for (name, value) in [
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
async fn next_on_blank_step_shows_errors_and_stays() {
    let mut harness = Harness::open(offline(), None).await;

    harness.send(ApplyIntent::Next);
    harness.settle().await;

    let (step, errors, notice) = harness.session(|session| {
        (
            session.controller().current_step(),
            session.controller().errors().len(),
            session.notice().map(|notice| notice.kind),
        )
    });
    assert_eq!(step, 1);
    assert_eq!(errors, 8);
    assert_eq!(notice, Some(NoticeKind::Error));
    assert!(harness.drafts.load().await.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn completing_a_step_advances_and_saves_draft() {
    let mut harness = Harness::open(offline(), None).await;

    for (name, value) in personal_details() {
        harness.send(ApplyIntent::SetText(name.to_string(), value.to_string()));
    }
    harness.send(ApplyIntent::Next);
    harness.settle().await;

    assert_eq!(harness.session(|s| s.controller().current_step()), 2);
    assert_eq!(harness.session(|s| s.notice().cloned()), None);
    let draft = harness.drafts.load().await.expect("draft saved on next");
    assert_eq!(draft.current_step(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn entries_can_be_added_but_never_all_removed() {
    let mut harness = Harness::open(offline(), None).await;
    let first = harness.session(|s| s.controller().state().academic().entries()[0].ordinal());

    harness.send(ApplyIntent::RemoveEntry(first));
    assert_eq!(harness.session(|s| s.controller().state().academic().len()), 1);

    harness.send(ApplyIntent::AddEntry);
    harness.send(ApplyIntent::RemoveEntry(first));
    let remaining = harness.session(|s| {
        s.controller()
            .state()
            .academic()
            .entries()
            .iter()
            .map(|entry| entry.ordinal())
            .collect::<Vec<_>>()
    });
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0], first);
}

#[tokio::test(flavor = "current_thread")]
async fn submit_sends_once_and_locks_the_form() {
    let transport = ScriptedTransport::replying(Ok(SubmissionResponse {
        success: true,
        application_id: Some("APP-0042".to_string()),
        ..SubmissionResponse::default()
    }));
    let mut harness = Harness::open(transport, Some(ready_to_submit(5))).await;
    assert_eq!(harness.session(|s| s.controller().current_step()), 5);

    harness.send(ApplyIntent::Submit);
    harness.send(ApplyIntent::Submit);
    harness.settle().await;

    assert_eq!(harness.transport.sent().len(), 1);
    let (phase, locked, notice) = harness.session(|s| {
        (
            s.phase().clone(),
            s.controller().is_locked(),
            s.notice().map(|notice| notice.message.clone()),
        )
    });
    assert!(matches!(phase, SubmitPhase::Submitted(ref id) if id.as_str() == "APP-0042"));
    assert!(locked);
    assert_eq!(
        notice.as_deref(),
        Some("Application submitted successfully. Your application ID is APP-0042.")
    );
    assert!(harness.drafts.load().await.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn network_failure_keeps_the_draft_and_reenables_submit() {
    let mut harness = Harness::open(offline(), Some(ready_to_submit(5))).await;

    harness.send(ApplyIntent::Submit);
    harness.settle().await;

    assert_eq!(harness.transport.sent().len(), 1);
    let (disabled, notice) = harness.session(|s| {
        (
            s.submit_disabled(),
            s.notice().map(|notice| (notice.kind, notice.message.clone())),
        )
    });
    assert!(!disabled);
    assert_eq!(
        notice,
        Some((
            NoticeKind::Error,
            "Network error. Please check your connection and try again.".to_string()
        ))
    );
    assert!(harness.drafts.load().await.is_some());
}

#[tokio::test(flavor = "current_thread")]
async fn in_flight_submission_ignores_edits_and_start_over() {
    let transport = ScriptedTransport::replying(Ok(SubmissionResponse {
        success: true,
        application_id: Some("APP-0043".to_string()),
        ..SubmissionResponse::default()
    }));
    let mut harness = Harness::open(transport, Some(ready_to_submit(5))).await;

    harness.send(ApplyIntent::Submit);
    harness.send(ApplyIntent::SetText(
        names::FIRST_NAME.to_string(),
        "Changed".to_string(),
    ));
    harness.send(ApplyIntent::Prev);
    harness.send(ApplyIntent::StartOver);
    let (phase, step, first_name) = harness.session(|s| {
        (
            s.phase().clone(),
            s.controller().current_step(),
            s.controller()
                .state()
                .text(&FieldName::known(names::FIRST_NAME))
                .to_string(),
        )
    });
    assert_eq!(phase, SubmitPhase::Submitting);
    assert_eq!(step, 5);
    assert_eq!(first_name, "Ada");

    harness.settle().await;

    let sent = harness.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].values(names::FIRST_NAME), vec!["Ada"]);
    let (phase, receipt_id, first_name) = harness.session(|s| {
        (
            s.phase().clone(),
            s.receipt().map(|receipt| receipt.application_id.to_string()),
            s.controller()
                .state()
                .text(&FieldName::known(names::FIRST_NAME))
                .to_string(),
        )
    });
    assert!(matches!(phase, SubmitPhase::Submitted(_)));
    assert_eq!(receipt_id.as_deref(), Some("APP-0043"));
    assert_eq!(first_name, "Ada");
    assert!(harness.drafts.load().await.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn submit_before_the_last_step_is_ignored() {
    let mut harness = Harness::open(offline(), Some(ready_to_submit(2))).await;

    harness.send(ApplyIntent::Submit);
    harness.settle().await;

    assert!(harness.transport.sent().is_empty());
    let (step, phase, errors) = harness.session(|s| {
        (
            s.controller().current_step(),
            s.phase().clone(),
            s.controller().errors().len(),
        )
    });
    assert_eq!(step, 2);
    assert_eq!(phase, SubmitPhase::default());
    assert_eq!(errors, 0);
}

#[tokio::test(flavor = "current_thread")]
async fn start_over_blanks_the_form_and_drops_the_draft() {
    let mut harness = Harness::open(offline(), Some(ready_to_submit(3))).await;
    assert!(harness.drafts.load().await.is_some());

    harness.send(ApplyIntent::StartOver);
    harness.settle().await;

    let (step, email) = harness.session(|s| {
        (
            s.controller().current_step(),
            s.controller()
                .state()
                .text(&FieldName::known(names::EMAIL))
                .to_string(),
        )
    });
    assert_eq!(step, 1);
    assert!(email.is_empty());
    assert!(harness.drafts.load().await.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn picked_files_are_recorded_for_upload() {
    let mut harness = Harness::open(offline(), Some(ready_to_submit(4))).await;

    harness.send(ApplyIntent::AttachFiles(
        names::ADDITIONAL_FILES.to_string(),
        vec![ATTACHMENT.to_string(), ATTACHMENT.to_string()],
    ));
    harness.send(ApplyIntent::AttachFiles(names::TRANSCRIPTS.to_string(), Vec::new()));

    let (extra, transcripts) = harness.session(|s| {
        let state = s.controller().state();
        (
            state.field(&FieldName::known(names::ADDITIONAL_FILES)).cloned(),
            state.text(&FieldName::known(names::TRANSCRIPTS)).to_string(),
        )
    });
    assert_eq!(
        extra,
        Some(FieldValue::List(vec![
            ATTACHMENT.to_string(),
            ATTACHMENT.to_string()
        ]))
    );
    assert!(transcripts.is_empty());

    harness.send(ApplyIntent::Next);
    harness.settle().await;
    assert_eq!(harness.session(|s| s.controller().current_step()), 4);
}
