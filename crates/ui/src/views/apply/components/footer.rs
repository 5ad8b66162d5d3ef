use dioxus::prelude::*;

use crate::vm::NoticeVm;

use super::super::actions::ApplyIntent;

#[component]
pub fn NoticeBanner(notice: Option<NoticeVm>, dispatch: Callback<ApplyIntent>) -> Element {
    rsx! {
        div { id: "formMessages", class: "form-messages",
            if let Some(notice) = notice {
                div { class: notice.class,
                    span { class: "alert-message", "{notice.message}" }
                    button {
                        class: "btn-close",
                        r#type: "button",
                        onclick: move |_| dispatch.call(ApplyIntent::DismissNotice),
                        "Dismiss"
                    }
                }
            }
        }
    }
}

#[component]
pub fn WizardNav(
    show_prev: bool,
    show_next: bool,
    show_submit: bool,
    submit_label: &'static str,
    submit_disabled: bool,
    dispatch: Callback<ApplyIntent>,
) -> Element {
    rsx! {
        div { class: "form-navigation",
            // The form is frozen while a submission is in flight.
            if !submit_disabled {
                button {
                    id: "startOverBtn",
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| dispatch.call(ApplyIntent::StartOver),
                    "Start over"
                }
            }
            div { class: "form-navigation-actions",
                if show_prev {
                    button {
                        id: "prevBtn",
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: submit_disabled,
                        onclick: move |_| dispatch.call(ApplyIntent::Prev),
                        "Previous"
                    }
                }
                if show_next {
                    button {
                        id: "nextBtn",
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| dispatch.call(ApplyIntent::Next),
                        "Next"
                    }
                }
                if show_submit {
                    button {
                        id: "submitBtn",
                        class: "btn btn-success",
                        r#type: "button",
                        disabled: submit_disabled,
                        onclick: move |_| dispatch.call(ApplyIntent::Submit),
                        "{submit_label}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn SubmittedPanel(
    application_id: String,
    redirect: Option<String>,
    on_open: Callback<String>,
) -> Element {
    rsx! {
        div { class: "submitted-panel",
            h3 { "Thank you for applying" }
            p { "Your application ID is "
                strong { "{application_id}" }
            }
            if let Some(target) = redirect {
                button {
                    id: "confirmationBtn",
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_open.call(target.clone()),
                    "View confirmation"
                }
            }
        }
    }
}
