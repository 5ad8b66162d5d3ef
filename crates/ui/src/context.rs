use std::sync::Arc;

use services::{ApplicationWorkflow, SubmissionConfig};
use url::Url;

use crate::platform::LinkOpenerRef;

pub trait UiApp: Send + Sync {
    fn workflow(&self) -> Arc<ApplicationWorkflow>;
    fn submission_config(&self) -> SubmissionConfig;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    workflow: Arc<ApplicationWorkflow>,
    submission: SubmissionConfig,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            workflow: app.workflow(),
            submission: app.submission_config(),
            link_opener: app.link_opener(),
        }
    }

    #[must_use]
    pub fn workflow(&self) -> Arc<ApplicationWorkflow> {
        Arc::clone(&self.workflow)
    }

    /// Absolute URL for a `redirect` returned by the endpoint.
    #[must_use]
    pub fn confirmation_url(&self, redirect: &str) -> Option<Url> {
        self.submission.resolve_redirect(redirect)
    }

    pub fn open_link(&self, url: &str) {
        self.link_opener.open_url(url);
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
