//! Step and form validation.
//!
//! Validation never mutates the wizard and never fails: it returns the
//! ordered list of problems, and an empty list means the step may be left.

use std::path::Path;

use crate::model::{FieldKind, FieldName, FieldSpec, FieldValue, FormSchema, StepRule, WizardState};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const CHOICE_MESSAGE: &str = "Please select an option";
pub const CHECKBOX_MESSAGE: &str = "This box must be checked";
pub const FILE_MESSAGE: &str = "Please attach a file";
pub const MISSING_FILE_MESSAGE: &str = "The attached file could not be found";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const ACADEMIC_MESSAGE: &str = "Please add at least one academic entry";
pub const SUMMARY_MESSAGE: &str = "Please complete all required fields";

/// Field the academic-history rule reports against.
pub const EDUCATION_LEVEL_FIELD: &str = "education_level";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldName,
    pub message: String,
}

impl FieldError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Outcome of validating one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepValidation {
    pub step: u8,
    pub errors: Vec<FieldError>,
}

impl StepValidation {
    #[must_use]
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn error_for(&self, field: &FieldName) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| &error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Banner text shown alongside the inline messages.
    #[must_use]
    pub fn summary(&self) -> Option<&'static str> {
        (!self.valid()).then_some(SUMMARY_MESSAGE)
    }
}

/// Outcome of validating every step, as done before submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormValidation {
    pub steps: Vec<StepValidation>,
}

impl FormValidation {
    #[must_use]
    pub fn valid(&self) -> bool {
        self.steps.iter().all(StepValidation::valid)
    }

    #[must_use]
    pub fn first_invalid_step(&self) -> Option<u8> {
        self.steps
            .iter()
            .find(|step| !step.valid())
            .map(|step| step.step)
    }

    pub fn errors(&self) -> impl Iterator<Item = &FieldError> {
        self.steps.iter().flat_map(|step| step.errors.iter())
    }
}

/// Validate `step` of `schema` against `state`.
///
/// An unknown step number yields a single error so callers never advance past it.
#[must_use]
pub fn validate_step(schema: &FormSchema, state: &WizardState, step: u8) -> StepValidation {
    let Some(spec) = schema.step(step) else {
        return StepValidation {
            step,
            errors: vec![FieldError::new(
                FieldName::known("step"),
                format!("Step {step} does not exist"),
            )],
        };
    };

    let mut errors: Vec<FieldError> = spec
        .fields
        .iter()
        .filter_map(|field| check_field(field, state.field(&field.name)))
        .collect();

    for rule in &spec.rules {
        let error = match rule {
            StepRule::AcademicHistory => (!state.academic().has_education_level()).then(|| {
                FieldError::new(FieldName::known(EDUCATION_LEVEL_FIELD), ACADEMIC_MESSAGE)
            }),
            StepRule::Attachment { field, message } => state
                .field(field)
                .is_none_or(FieldValue::is_blank)
                .then(|| FieldError::new(field.clone(), message.clone())),
            StepRule::Consent { field, message } => (!state.is_checked(field))
                .then(|| FieldError::new(field.clone(), message.clone())),
        };
        if let Some(error) = error {
            // A rule restating a field requirement replaces the generic message.
            errors.retain(|existing| existing.field != error.field);
            errors.push(error);
        }
    }

    StepValidation { step, errors }
}

#[must_use]
pub fn validate_all(schema: &FormSchema, state: &WizardState) -> FormValidation {
    let steps = (1..=schema.total_steps())
        .map(|step| validate_step(schema, state, step))
        .collect();
    FormValidation { steps }
}

fn check_field(spec: &FieldSpec, value: Option<&FieldValue>) -> Option<FieldError> {
    let blank = value.is_none_or(FieldValue::is_blank);

    if spec.required && blank {
        let message = match spec.kind {
            FieldKind::Choice(_) => CHOICE_MESSAGE,
            FieldKind::Checkbox => CHECKBOX_MESSAGE,
            FieldKind::File { .. } => FILE_MESSAGE,
            _ => REQUIRED_MESSAGE,
        };
        return Some(FieldError::new(spec.name.clone(), message));
    }
    if blank {
        return None;
    }

    match (&spec.kind, value) {
        (FieldKind::Choice(options), Some(FieldValue::Text(selected)))
            if !options.is_empty() && !options.iter().any(|opt| opt == selected.trim()) =>
        {
            Some(FieldError::new(spec.name.clone(), CHOICE_MESSAGE))
        }
        (FieldKind::Email, Some(FieldValue::Text(email))) if !looks_like_email(email) => {
            Some(FieldError::new(spec.name.clone(), EMAIL_MESSAGE))
        }
        (FieldKind::File { .. }, Some(value))
            if value.entries().into_iter().any(|path| !Path::new(path).is_file()) =>
        {
            Some(FieldError::new(spec.name.clone(), MISSING_FILE_MESSAGE))
        }
        _ => None,
    }
}

fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    let mut parts = raw.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !raw.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}
