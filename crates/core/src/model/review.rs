use std::path::Path;

use crate::model::academic::AcademicField;
use crate::model::field::FieldValue;
use crate::model::schema::{FieldKind, FormSchema};
use crate::model::wizard::WizardState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewLine {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewSection {
    pub title: String,
    pub lines: Vec<ReviewLine>,
}

/// Read-only recap shown on the final step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewSummary {
    pub sections: Vec<ReviewSection>,
}

impl ReviewSummary {
    /// One section per step before the last, built purely from `state`.
    #[must_use]
    pub fn build(schema: &FormSchema, state: &WizardState) -> Self {
        let last = schema.total_steps();
        let sections = schema
            .steps()
            .iter()
            .filter(|step| step.number != last)
            .map(|step| {
                let mut lines: Vec<ReviewLine> = step
                    .fields
                    .iter()
                    .map(|spec| ReviewLine {
                        label: spec.label.clone(),
                        value: display_value(&spec.kind, state.field(&spec.name)),
                    })
                    .collect();
                if step.has_academic_history() {
                    lines.extend(academic_lines(state));
                }
                ReviewSection {
                    title: step.title.clone(),
                    lines,
                }
            })
            .collect();
        Self { sections }
    }
}

fn display_value(kind: &FieldKind, value: Option<&FieldValue>) -> String {
    match (kind, value) {
        (FieldKind::Checkbox, value) => {
            if value.is_some_and(FieldValue::is_checked) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        (FieldKind::File { .. }, Some(value)) if !value.is_blank() => value
            .entries()
            .into_iter()
            .map(|path| {
                Path::new(path)
                    .file_name()
                    .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned())
            })
            .collect::<Vec<_>>()
            .join(", "),
        (_, Some(FieldValue::List(items))) if !items.is_empty() => items.join(", "),
        (_, Some(FieldValue::Text(text))) if !text.trim().is_empty() => text.trim().to_string(),
        (_, Some(FieldValue::Flag(flag))) => (if *flag { "Yes" } else { "No" }).to_string(),
        (FieldKind::Choice(_), _) => "Not selected".to_string(),
        (FieldKind::File { .. }, _) => "Not attached".to_string(),
        _ => "Not provided".to_string(),
    }
}

fn academic_lines(state: &WizardState) -> Vec<ReviewLine> {
    let history = state.academic();
    let count = history.len();
    let noun = if count == 1 { "entry" } else { "entries" };
    let mut lines = vec![ReviewLine {
        label: "Academic entries".to_string(),
        value: format!("{count} academic {noun} provided"),
    }];
    for (index, entry) in history.entries().iter().enumerate() {
        let parts: Vec<&str> = [
            AcademicField::EducationLevel,
            AcademicField::Institution,
            AcademicField::FieldOfStudy,
            AcademicField::GraduationYear,
        ]
        .into_iter()
        .map(|field| entry.get(field).trim())
        .filter(|part| !part.is_empty())
        .collect();
        let value = if parts.is_empty() {
            "Not provided".to_string()
        } else {
            parts.join(", ")
        };
        lines.push(ReviewLine {
            label: format!("Academic Entry #{}", index + 1),
            value,
        });
    }
    lines
}
