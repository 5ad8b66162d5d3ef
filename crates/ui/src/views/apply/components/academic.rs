use admissions_core::model::{AcademicField, Ordinal};
use dioxus::prelude::*;

use crate::vm::{AcademicEntryVm, AcademicSectionVm};

use super::super::actions::ApplyIntent;

#[component]
pub fn AcademicEntries(section: AcademicSectionVm, dispatch: Callback<ApplyIntent>) -> Element {
    rsx! {
        div { class: "academic-section",
            h3 { class: "section-title", "Academic History" }
            div { id: "academicEntriesContainer",
                for entry in section.entries.iter().cloned() {
                    AcademicEntryCard { key: "{entry.ordinal}", entry, dispatch }
                }
            }
            if let Some(message) = section.error.as_ref() {
                div { class: "invalid-feedback d-block", "{message}" }
            }
            button {
                id: "addAcademicEntryBtn",
                class: "btn btn-outline",
                r#type: "button",
                onclick: move |_| dispatch.call(ApplyIntent::AddEntry),
                "{section.add_label}"
            }
        }
    }
}

#[component]
fn AcademicEntryCard(entry: AcademicEntryVm, dispatch: Callback<ApplyIntent>) -> Element {
    let ordinal = entry.ordinal;
    let level_id = control_id(AcademicField::EducationLevel, ordinal);
    rsx! {
        div { class: "academic-entry",
            div { class: "academic-entry-header",
                h4 { "{entry.heading}" }
                if entry.can_remove {
                    button {
                        class: "btn btn-link remove-entry-btn",
                        r#type: "button",
                        onclick: move |_| dispatch.call(ApplyIntent::RemoveEntry(ordinal)),
                        "Remove"
                    }
                }
            }
            div { class: "form-group",
                label { r#for: "{level_id}", "{AcademicField::EducationLevel.label()}" }
                select {
                    id: "{level_id}",
                    name: AcademicField::EducationLevel.form_key(),
                    class: "form-control",
                    onchange: move |evt: FormEvent| {
                        dispatch.call(ApplyIntent::UpdateEntry(
                            ordinal,
                            AcademicField::EducationLevel,
                            evt.value(),
                        ));
                    },
                    option { value: "", "Select..." }
                    for level in entry.education_levels.iter() {
                        option {
                            key: "{level.value}",
                            value: "{level.value}",
                            selected: level.selected,
                            "{level.label}"
                        }
                    }
                }
            }
            EntryInput {
                ordinal,
                field: AcademicField::Institution,
                value: entry.institution.clone(),
                input_type: "text",
                dispatch,
            }
            EntryInput {
                ordinal,
                field: AcademicField::FieldOfStudy,
                value: entry.field_of_study.clone(),
                input_type: "text",
                dispatch,
            }
            EntryInput {
                ordinal,
                field: AcademicField::GraduationYear,
                value: entry.graduation_year.clone(),
                input_type: "number",
                dispatch,
            }
            EntryInput {
                ordinal,
                field: AcademicField::Gpa,
                value: entry.gpa.clone(),
                input_type: "text",
                dispatch,
            }
        }
    }
}

#[component]
fn EntryInput(
    ordinal: Ordinal,
    field: AcademicField,
    value: String,
    input_type: &'static str,
    dispatch: Callback<ApplyIntent>,
) -> Element {
    let id = control_id(field, ordinal);
    rsx! {
        div { class: "form-group",
            label { r#for: "{id}", "{field.label()}" }
            input {
                id: "{id}",
                name: field.form_key(),
                class: "form-control",
                r#type: input_type,
                value: "{value}",
                oninput: move |evt: FormEvent| {
                    dispatch.call(ApplyIntent::UpdateEntry(ordinal, field, evt.value()));
                },
            }
        }
    }
}

fn control_id(field: AcademicField, ordinal: Ordinal) -> String {
    format!("{}_{ordinal}", field.form_key().trim_end_matches("[]"))
}
