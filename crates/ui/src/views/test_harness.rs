use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use admissions_core::time::fixed_now;
use services::{
    AppServices, ApplicationWorkflow, Clock, DraftStore, SubmissionConfig, SubmissionPayload,
    SubmissionResponse, SubmissionTransport, TransportError,
};

use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, NoopLinkOpener};
use crate::views::ApplyView;

/// Transport that replays canned replies and records what was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<SubmissionResponse, TransportError>>>,
    sent: Mutex<Vec<SubmissionPayload>>,
}

impl ScriptedTransport {
    pub fn replying(reply: Result<SubmissionResponse, TransportError>) -> Arc<Self> {
        let transport = Self::default();
        transport.replies.lock().unwrap().push_back(reply);
        Arc::new(transport)
    }

    pub fn sent(&self) -> Vec<SubmissionPayload> {
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

#[derive(Clone)]
struct TestApp {
    workflow: Arc<ApplicationWorkflow>,
}

impl UiApp for TestApp {
    fn workflow(&self) -> Arc<ApplicationWorkflow> {
        Arc::clone(&self.workflow)
    }

    fn submission_config(&self) -> SubmissionConfig {
        SubmissionConfig::new("http://localhost:8000/apply/").expect("test endpoint")
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(NoopLinkOpener)
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    rsx! { ApplyView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub drafts: Arc<DraftStore>,
    pub transport: Arc<ScriptedTransport>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Build the view and let the draft lookup finish.
    pub async fn open(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(transport: Arc<ScriptedTransport>) -> ViewHarness {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), transport.clone());
    let app = Arc::new(TestApp {
        workflow: services.workflow(),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app });
    ViewHarness {
        dom,
        drafts: services.drafts(),
        transport,
    }
}
