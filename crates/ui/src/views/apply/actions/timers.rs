use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use services::{ApplicationWorkflow, AutosaveTicket, Notice, WizardSession};

use super::with_session;

/// Save after the quiet period unless a newer edit took over the ticket.
pub(super) fn schedule_autosave(
    session: Signal<Option<WizardSession>>,
    workflow: Arc<ApplicationWorkflow>,
    ticket: AutosaveTicket,
    delay: Duration,
) {
    spawn(async move {
        tokio::time::sleep(delay).await;
        let snapshot = {
            let guard = session.peek();
            match &*guard {
                Some(current) if current.autosave_due(ticket) => {
                    Some(current.controller().state().clone())
                }
                _ => None,
            }
        };
        if let Some(state) = snapshot {
            workflow.autosave(&state).await;
        }
    });
}

/// Hide `notice` once its display time is up, if it is still showing.
pub(crate) fn schedule_notice_expiry(session: Signal<Option<WizardSession>>, notice: Notice) {
    let Some(delay) = notice.auto_hide_after() else {
        return;
    };
    spawn(async move {
        tokio::time::sleep(delay).await;
        with_session(session, |current| current.expire_notice(&notice));
    });
}
