mod intent;
mod submit;
mod timers;

use std::sync::Arc;

use admissions_core::model::FieldName;
use dioxus::prelude::*;
use services::{ApplicationWorkflow, SessionSlot, WizardSession};

use super::state::{ApplyServices, ApplyState};

pub use intent::ApplyIntent;
pub(crate) use timers::schedule_notice_expiry;

pub fn use_apply_dispatcher(state: &ApplyState, services: &ApplyServices) -> Callback<ApplyIntent> {
    let session = state.session;
    let workflow = Arc::clone(&services.workflow);
    use_callback(move |intent: ApplyIntent| dispatch_intent(intent, session, &workflow))
}

/// Signal-backed slot; each access is a short write borrow.
#[derive(Clone, Copy)]
pub(crate) struct SessionCell(pub Signal<Option<WizardSession>>);

impl SessionSlot for SessionCell {
    fn with_session<R>(&mut self, apply: impl FnOnce(&mut WizardSession) -> R) -> Option<R> {
        let mut guard = self.0.write();
        guard.as_mut().map(apply)
    }
}

/// Run `apply` against the open session, if there is one.
pub(crate) fn with_session<R>(
    session: Signal<Option<WizardSession>>,
    apply: impl FnOnce(&mut WizardSession) -> R,
) -> Option<R> {
    SessionCell(session).with_session(apply)
}

fn dispatch_intent(
    intent: ApplyIntent,
    session: Signal<Option<WizardSession>>,
    workflow: &Arc<ApplicationWorkflow>,
) {
    match intent {
        ApplyIntent::Next => {
            let workflow = Arc::clone(workflow);
            spawn(async move {
                workflow.go_next(&mut SessionCell(session)).await;
            });
        }
        ApplyIntent::Prev => {
            with_session(session, WizardSession::go_prev);
        }
        ApplyIntent::JumpTo(step) => {
            with_session(session, |current| current.jump_to(step));
        }
        ApplyIntent::SetText(name, value) => {
            let Ok(name) = FieldName::new(name) else {
                return;
            };
            edit(session, workflow, |current| current.set_field(name, value));
        }
        ApplyIntent::SetFlag(name, checked) => {
            let Ok(name) = FieldName::new(name) else {
                return;
            };
            edit(session, workflow, |current| current.set_field(name, checked));
        }
        ApplyIntent::AttachFiles(name, paths) => {
            let Ok(name) = FieldName::new(name) else {
                return;
            };
            edit(session, workflow, |current| current.attach_files(name, paths));
        }
        ApplyIntent::AddEntry => {
            edit(session, workflow, |current| current.add_entry().is_ok());
        }
        ApplyIntent::RemoveEntry(ordinal) => {
            edit(session, workflow, |current| current.remove_entry(ordinal).is_ok());
        }
        ApplyIntent::UpdateEntry(ordinal, field, value) => {
            edit(session, workflow, |current| {
                current.update_entry(ordinal, field, value).is_ok()
            });
        }
        ApplyIntent::Submit => submit::submit_application(session, Arc::clone(workflow)),
        ApplyIntent::DismissNotice => {
            with_session(session, WizardSession::dismiss_notice);
        }
        ApplyIntent::StartOver => {
            let workflow = Arc::clone(workflow);
            spawn(async move {
                // Refusals are logged by the workflow.
                let _ = workflow.start_over(&mut SessionCell(session)).await;
            });
        }
    }
}

/// Apply an edit and, when it changed anything, arm the debounced autosave.
fn edit(
    session: Signal<Option<WizardSession>>,
    workflow: &Arc<ApplicationWorkflow>,
    change: impl FnOnce(&mut WizardSession) -> bool,
) {
    let scheduled = with_session(session, |current| {
        change(current).then(|| (current.schedule_autosave(), current.autosave_delay()))
    })
    .flatten();
    if let Some((ticket, delay)) = scheduled {
        timers::schedule_autosave(session, Arc::clone(workflow), ticket, delay);
    }
}
