use std::sync::Arc;

use dioxus::prelude::*;
use services::{ApplicationWorkflow, SubmitError, WizardSession};

use super::{SessionCell, with_session};

/// Enter `Submitting` straight away, then deliver and settle in the background.
///
/// Only the last step submits; an implicit form submit from an earlier step
/// is ignored.
pub(super) fn submit_application(
    session: Signal<Option<WizardSession>>,
    workflow: Arc<ApplicationWorkflow>,
) {
    let Some(prepared) = with_session(session, |current| {
        if !current.controller().state().is_last_step() {
            return None;
        }
        Some(current.begin_submission())
    })
    .flatten() else {
        tracing::debug!("submit ignored before the last step");
        return;
    };
    let payload = match prepared {
        Ok(payload) => payload,
        Err(SubmitError::Validation {
            first_invalid_step, ..
        }) => {
            tracing::debug!(first_invalid_step, "submit blocked by validation");
            return;
        }
        Err(err) => {
            tracing::debug!(error = %err, "submit ignored");
            return;
        }
    };

    spawn(async move {
        // The session records the outcome; nothing else to do here.
        let _ = workflow.settle(&mut SessionCell(session), &payload).await;
    });
}
