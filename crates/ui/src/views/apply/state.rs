use std::sync::Arc;

use dioxus::prelude::*;
use services::{ApplicationWorkflow, WizardSession};

use crate::views::ViewError;

#[derive(Clone)]
pub struct ApplyServices {
    pub workflow: Arc<ApplicationWorkflow>,
}

/// Signals behind the apply page.
///
/// `session` stays `None` until the stored draft has been looked up.
#[derive(Clone, Copy)]
pub struct ApplyState {
    pub session: Signal<Option<WizardSession>>,
    pub loader: Resource<Result<(), ViewError>>,
}

pub fn use_apply_state(services: &ApplyServices) -> ApplyState {
    let session = use_signal(|| None::<WizardSession>);
    let workflow = Arc::clone(&services.workflow);
    let loader = use_resource(move || {
        let workflow = Arc::clone(&workflow);
        let mut session = session;
        async move {
            let opened = workflow.start().await;
            let restored = opened.notice().cloned();
            session.set(Some(opened));
            if let Some(notice) = restored {
                super::actions::schedule_notice_expiry(session, notice);
            }
            Ok(())
        }
    });
    ApplyState { session, loader }
}
