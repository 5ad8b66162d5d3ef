use std::path::Path;

use admissions_core::model::{
    AcademicField, EDUCATION_LEVELS, FieldKind, FieldSpec, FieldValue, Ordinal, ReviewSummary,
};
use admissions_core::validation::EDUCATION_LEVEL_FIELD;
use services::{NoticeKind, StepView, WizardSession};

use super::label_fmt::humanize_option;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceOptionVm {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldInputVm {
    Text { input_type: &'static str },
    LongText,
    Select(Vec<ChoiceOptionVm>),
    Checkbox { checked: bool },
    /// `attached` holds the picked files' names, for display.
    File { multiple: bool, attached: Vec<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldVm {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub input: FieldInputVm,
    pub value: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcademicEntryVm {
    pub ordinal: Ordinal,
    pub heading: String,
    pub education_levels: Vec<ChoiceOptionVm>,
    pub institution: String,
    pub field_of_study: String,
    pub graduation_year: String,
    pub gpa: String,
    pub can_remove: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcademicSectionVm {
    pub entries: Vec<AcademicEntryVm>,
    pub add_label: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeVm {
    pub class: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewSectionVm {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

/// Everything the wizard page renders, derived from the session alone.
#[derive(Clone, Debug, PartialEq)]
pub struct WizardVm {
    pub step: StepView,
    pub fields: Vec<FieldVm>,
    pub academic: Option<AcademicSectionVm>,
    pub review: Vec<ReviewSectionVm>,
    pub notice: Option<NoticeVm>,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
    pub application_id: Option<String>,
    pub redirect: Option<String>,
}

#[must_use]
pub fn map_wizard(session: &WizardSession) -> WizardVm {
    let controller = session.controller();
    let schema = controller.schema();
    let state = controller.state();
    let step = session.view();

    let current = schema.step(step.current_step);
    let fields = if step.submitted {
        Vec::new()
    } else {
        current
            .map(|spec| {
                spec.fields
                    .iter()
                    .map(|field| {
                        let mut vm = map_field(
                            field,
                            state.field(&field.name),
                            controller.error_for(&field.name),
                        );
                        vm.required = schema.is_mandatory(&field.name);
                        vm
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    let academic = current
        .filter(|spec| spec.has_academic_history() && !step.submitted)
        .map(|_| {
            let history = state.academic();
            let can_remove = history.can_remove();
            let entries = history
                .entries()
                .iter()
                .enumerate()
                .map(|(index, entry)| AcademicEntryVm {
                    ordinal: entry.ordinal(),
                    heading: format!("Academic Entry #{}", index + 1),
                    education_levels: choice_options(
                        EDUCATION_LEVELS.as_slice(),
                        entry.get(AcademicField::EducationLevel),
                    ),
                    institution: entry.get(AcademicField::Institution).to_string(),
                    field_of_study: entry.get(AcademicField::FieldOfStudy).to_string(),
                    graduation_year: entry.get(AcademicField::GraduationYear).to_string(),
                    gpa: entry.get(AcademicField::Gpa).to_string(),
                    can_remove,
                })
                .collect();
            let error = controller
                .errors()
                .iter()
                .find(|error| error.field.as_str() == EDUCATION_LEVEL_FIELD)
                .map(|error| error.message.clone());
            AcademicSectionVm {
                entries,
                add_label: history.add_button_label(),
                error,
            }
        });

    let review = step
        .review
        .as_ref()
        .map(map_review)
        .unwrap_or_default();

    let notice = session.notice().map(|notice| NoticeVm {
        class: match notice.kind {
            NoticeKind::Info => "alert alert-info",
            NoticeKind::Success => "alert alert-success",
            NoticeKind::Error => "alert alert-danger",
        },
        message: notice.message.clone(),
    });

    let receipt = session.receipt();
    WizardVm {
        step,
        fields,
        academic,
        review,
        notice,
        submit_label: session.submit_label(),
        submit_disabled: session.submit_disabled(),
        application_id: receipt.map(|receipt| receipt.application_id.to_string()),
        redirect: receipt.and_then(|receipt| receipt.redirect.clone()),
    }
}

fn map_field(spec: &FieldSpec, value: Option<&FieldValue>, error: Option<&str>) -> FieldVm {
    let text = match value {
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::List(items)) => items.join(", "),
        Some(FieldValue::Flag(_)) | None => String::new(),
    };
    let input = match &spec.kind {
        FieldKind::Text => FieldInputVm::Text { input_type: "text" },
        FieldKind::Email => FieldInputVm::Text { input_type: "email" },
        FieldKind::Phone => FieldInputVm::Text { input_type: "tel" },
        FieldKind::Date => FieldInputVm::Text { input_type: "date" },
        FieldKind::LongText => FieldInputVm::LongText,
        FieldKind::Choice(options) => FieldInputVm::Select(choice_options(options.as_slice(), &text)),
        FieldKind::Checkbox => FieldInputVm::Checkbox {
            checked: value.is_some_and(FieldValue::is_checked),
        },
        FieldKind::File { multiple } => FieldInputVm::File {
            multiple: *multiple,
            attached: value.map(attached_names).unwrap_or_default(),
        },
    };
    FieldVm {
        name: spec.name.as_str().to_string(),
        label: spec.label.clone(),
        required: spec.required,
        input,
        value: text,
        error: error.map(str::to_owned),
    }
}

fn attached_names(value: &FieldValue) -> Vec<String> {
    value
        .entries()
        .into_iter()
        .map(|path| {
            Path::new(path)
                .file_name()
                .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned())
        })
        .collect()
}

fn choice_options<S: AsRef<str>>(options: &[S], selected: &str) -> Vec<ChoiceOptionVm> {
    options
        .iter()
        .map(|option| {
            let option = option.as_ref();
            ChoiceOptionVm {
                value: option.to_string(),
                label: humanize_option(option),
                selected: option == selected.trim(),
            }
        })
        .collect()
}

fn map_review(summary: &ReviewSummary) -> Vec<ReviewSectionVm> {
    summary
        .sections
        .iter()
        .map(|section| ReviewSectionVm {
            title: section.title.clone(),
            lines: section
                .lines
                .iter()
                .map(|line| (line.label.clone(), line.value.clone()))
                .collect(),
        })
        .collect()
}
