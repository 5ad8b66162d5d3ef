use dioxus::prelude::*;
use services::{StepIndicator, StepStatus, StepView};

use super::super::actions::ApplyIntent;

#[component]
pub fn ProgressHeader(step: StepView, dispatch: Callback<ApplyIntent>) -> Element {
    let width = format!("width: {:.0}%", step.progress_percent);
    let locked = step.submitted;
    rsx! {
        div { class: "wizard-progress",
            div { class: "progress",
                div { id: "progressBar", class: "progress-bar", style: "{width}" }
            }
            span { id: "progressPercentage", class: "progress-label", "{step.progress_label}%" }
            ol { class: "step-indicators",
                for indicator in step.indicators.iter().cloned() {
                    StepBadge {
                        key: "{indicator.number}",
                        indicator,
                        locked,
                        dispatch,
                    }
                }
            }
            h2 { id: "stepTitle", class: "step-title", "{step.title}" }
        }
    }
}

#[component]
fn StepBadge(indicator: StepIndicator, locked: bool, dispatch: Callback<ApplyIntent>) -> Element {
    let class = match indicator.status {
        StepStatus::Completed => "step-indicator completed",
        StepStatus::Active => "step-indicator active",
        StepStatus::Upcoming => "step-indicator",
    };
    let number = indicator.number;
    rsx! {
        li { class,
            button {
                class: "step-indicator-button",
                r#type: "button",
                disabled: locked,
                onclick: move |_| dispatch.call(ApplyIntent::JumpTo(number)),
                span { class: "step-number", "{number}" }
                span { class: "step-name", "{indicator.title}" }
            }
        }
    }
}
