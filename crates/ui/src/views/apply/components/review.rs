use dioxus::prelude::*;

use crate::vm::ReviewSectionVm;

#[component]
pub fn ReviewPanel(sections: Vec<ReviewSectionVm>) -> Element {
    rsx! {
        div { id: "reviewSummary", class: "review-summary",
            h3 { class: "section-title", "Review your application" }
            for section in sections.iter() {
                div { key: "{section.title}", class: "review-section",
                    h4 { "{section.title}" }
                    dl {
                        for (label, value) in section.lines.iter() {
                            dt { "{label}" }
                            dd { "{value}" }
                        }
                    }
                }
            }
        }
    }
}
