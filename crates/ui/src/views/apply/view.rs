use dioxus::prelude::*;

use crate::context::AppContext;
use crate::vm::{WizardVm, map_wizard};
use crate::views::{ViewState, view_state_from_resource};

use super::actions::{ApplyIntent, use_apply_dispatcher};
use super::components::{
    AcademicEntries, FieldRow, NoticeBanner, ProgressHeader, ReviewPanel, SubmittedPanel,
    WizardNav,
};
use super::state::{ApplyServices, use_apply_state};

#[component]
pub fn ApplyView() -> Element {
    let ctx = use_context::<AppContext>();
    let services = ApplyServices {
        workflow: ctx.workflow(),
    };
    let state = use_apply_state(&services);
    let dispatch = use_apply_dispatcher(&state, &services);
    let on_open = use_callback(move |redirect: String| {
        match ctx.confirmation_url(&redirect) {
            Some(url) => ctx.open_link(url.as_str()),
            None => tracing::warn!(%redirect, "unusable confirmation redirect"),
        }
    });

    let load_state = view_state_from_resource(state.loader);
    let vm = state.session.read().as_ref().map(map_wizard);

    rsx! {
        div { class: "page apply-page",
            match (vm, load_state) {
                (Some(vm), _) => rsx! { WizardForm { vm, dispatch, on_open } },
                (None, ViewState::Error(err)) => rsx! {
                    p { class: "muted", "{err.message()}" }
                },
                (None, _) => rsx! {
                    p { class: "muted", "Loading application..." }
                },
            }
        }
    }
}

#[component]
fn WizardForm(vm: WizardVm, dispatch: Callback<ApplyIntent>, on_open: Callback<String>) -> Element {
    let step = vm.step.clone();
    let current = step.current_step;
    let show_submit = step.show_submit;
    rsx! {
        div { class: "wizard",
            ProgressHeader { step: step.clone(), dispatch }
            NoticeBanner { notice: vm.notice.clone(), dispatch }
            form { class: "application-form", novalidate: true,
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    // Enter in a text field submits the form; only the last step may.
                    if show_submit {
                        dispatch.call(ApplyIntent::Submit);
                    }
                },
                for number in 1..=step.total_steps {
                    fieldset {
                        key: "{number}",
                        id: "step{number}",
                        class: if number == current && !step.submitted { "form-step active" } else { "form-step" },
                        hidden: number != current || step.submitted,
                        disabled: vm.submit_disabled,
                        if number == current && !step.submitted {
                            for field in vm.fields.iter().cloned() {
                                FieldRow { key: "{field.name}", field, dispatch }
                            }
                            if let Some(section) = vm.academic.clone() {
                                AcademicEntries { section, dispatch }
                            }
                            if step.review.is_some() {
                                ReviewPanel { sections: vm.review.clone() }
                            }
                        }
                    }
                }
            }
            if let Some(application_id) = vm.application_id.clone() {
                SubmittedPanel { application_id, redirect: vm.redirect.clone(), on_open }
            } else {
                WizardNav {
                    show_prev: step.show_prev,
                    show_next: step.show_next,
                    show_submit: step.show_submit,
                    submit_label: vm.submit_label,
                    submit_disabled: vm.submit_disabled,
                    dispatch,
                }
            }
        }
    }
}
