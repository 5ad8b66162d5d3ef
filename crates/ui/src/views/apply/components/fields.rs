use dioxus::prelude::*;

use crate::vm::{FieldInputVm, FieldVm};

use super::super::actions::ApplyIntent;

/// Label, control and inline error for one form field.
#[component]
pub fn FieldRow(field: FieldVm, dispatch: Callback<ApplyIntent>) -> Element {
    let FieldVm {
        name,
        label: caption,
        required,
        input,
        value,
        error,
    } = field;
    let control_class = if error.is_some() {
        "form-control is-invalid"
    } else {
        "form-control"
    };

    if let FieldInputVm::Checkbox { checked } = input {
        let target = name.clone();
        let check_class = if error.is_some() {
            "form-check-input is-invalid"
        } else {
            "form-check-input"
        };
        return rsx! {
            div { class: "form-check",
                input {
                    id: "{name}",
                    name: "{name}",
                    class: check_class,
                    r#type: "checkbox",
                    checked,
                    onchange: move |evt: FormEvent| {
                        dispatch.call(ApplyIntent::SetFlag(target.clone(), evt.checked()));
                    },
                }
                label { class: "form-check-label", r#for: "{name}",
                    "{caption}"
                    if required {
                        span { class: "required", " *" }
                    }
                }
                if let Some(message) = error.as_ref() {
                    div { class: "invalid-feedback", "{message}" }
                }
            }
        };
    }

    let target = name.clone();
    let on_text = move |evt: FormEvent| {
        dispatch.call(ApplyIntent::SetText(target.clone(), evt.value()));
    };
    let control = match input {
        FieldInputVm::Text { input_type } => rsx! {
            input {
                id: "{name}",
                name: "{name}",
                class: control_class,
                r#type: input_type,
                value: "{value}",
                oninput: on_text,
            }
        },
        FieldInputVm::LongText => rsx! {
            textarea {
                id: "{name}",
                name: "{name}",
                class: control_class,
                rows: "5",
                value: "{value}",
                oninput: on_text,
            }
        },
        FieldInputVm::Select(options) => rsx! {
            select {
                id: "{name}",
                name: "{name}",
                class: control_class,
                onchange: on_text,
                option { value: "", "Select..." }
                for choice in options {
                    option {
                        key: "{choice.value}",
                        value: "{choice.value}",
                        selected: choice.selected,
                        "{choice.label}"
                    }
                }
            }
        },
        FieldInputVm::File { multiple, attached } => {
            let target = name.clone();
            rsx! {
                input {
                    id: "{name}",
                    name: "{name}",
                    class: control_class,
                    r#type: "file",
                    accept: ".pdf,.doc,.docx",
                    multiple,
                    onchange: move |evt: FormEvent| {
                        let picked = evt
                            .files()
                            .iter()
                            .map(|file| file.path().display().to_string())
                            .collect();
                        dispatch.call(ApplyIntent::AttachFiles(target.clone(), picked));
                    },
                }
                if !attached.is_empty() {
                    ul { class: "attached-files",
                        for file_name in attached {
                            li { key: "{file_name}", "{file_name}" }
                        }
                    }
                }
            }
        }
        // Rendered by the early return above.
        FieldInputVm::Checkbox { .. } => rsx! {},
    };

    rsx! {
        div { class: "form-group",
            label { r#for: "{name}",
                "{caption}"
                if required {
                    span { class: "required", " *" }
                }
            }
            {control}
            if let Some(message) = error.as_ref() {
                div { class: "invalid-feedback", "{message}" }
            }
        }
    }
}
