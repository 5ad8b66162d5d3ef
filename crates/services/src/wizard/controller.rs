use admissions_core::model::{
    AcademicEntry, AcademicField, DraftSnapshot, FieldKind, FieldName, FieldValue, FormSchema,
    Ordinal, WizardState,
};
use admissions_core::validation::{
    EDUCATION_LEVEL_FIELD, FieldError, StepValidation, validate_step,
};

use super::view::StepView;
use crate::error::WizardError;

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Moved { from: u8, to: u8 },
    /// The current step failed validation; nothing changed.
    Blocked(StepValidation),
    /// Request was a no-op (first/last step, same step, out of range, or submitted).
    Unchanged,
}

impl NavOutcome {
    #[must_use]
    pub fn moved(&self) -> bool {
        matches!(self, NavOutcome::Moved { .. })
    }
}

/// Owns the wizard state for the lifetime of the form.
///
/// All transitions go through here; the UI only ever reads projections.
#[derive(Debug, Clone)]
pub struct StepController {
    schema: FormSchema,
    state: WizardState,
    errors: Vec<FieldError>,
    locked: bool,
}

impl StepController {
    #[must_use]
    pub fn new(schema: FormSchema) -> Self {
        let state = WizardState::for_schema(&schema);
        Self::from_state(schema, state)
    }

    #[must_use]
    pub fn from_state(schema: FormSchema, state: WizardState) -> Self {
        Self {
            schema,
            state,
            errors: Vec::new(),
            locked: false,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    #[must_use]
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    #[must_use]
    pub fn current_step(&self) -> u8 {
        self.state.current_step()
    }

    /// Inline errors from the last blocked transition, pruned as fields are edited.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn error_for(&self, field: &FieldName) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| &error.field == field)
            .map(|error| error.message.as_str())
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Freeze the form once the application has been accepted.
    pub fn lock(&mut self) {
        self.locked = true;
        self.errors.clear();
    }

    #[must_use]
    pub fn validate_current(&self) -> StepValidation {
        validate_step(&self.schema, &self.state, self.state.current_step())
    }

    pub(crate) fn show_errors(&mut self, errors: Vec<FieldError>) {
        self.errors = errors;
    }

    pub fn go_next(&mut self) -> NavOutcome {
        if self.locked || self.state.is_last_step() {
            return NavOutcome::Unchanged;
        }
        let validation = self.validate_current();
        if !validation.valid() {
            tracing::debug!(
                step = validation.step,
                errors = validation.errors.len(),
                "forward navigation blocked"
            );
            self.errors.clone_from(&validation.errors);
            return NavOutcome::Blocked(validation);
        }
        let from = self.state.current_step();
        self.state.advance();
        self.errors.clear();
        let to = self.state.current_step();
        tracing::debug!(from, to, "advanced step");
        NavOutcome::Moved { from, to }
    }

    /// Backward moves skip validation.
    pub fn go_prev(&mut self) -> NavOutcome {
        if self.locked {
            return NavOutcome::Unchanged;
        }
        let from = self.state.current_step();
        if !self.state.retreat() {
            return NavOutcome::Unchanged;
        }
        self.errors.clear();
        let to = self.state.current_step();
        tracing::debug!(from, to, "went back a step");
        NavOutcome::Moved { from, to }
    }

    /// Jump straight to `step`. Forward jumps require the current step to validate.
    pub fn jump_to(&mut self, step: u8) -> NavOutcome {
        let from = self.state.current_step();
        if self.locked || step == from || step == 0 || step > self.state.total_steps() {
            tracing::debug!(step, from, "ignored jump");
            return NavOutcome::Unchanged;
        }
        if step > from {
            let validation = self.validate_current();
            if !validation.valid() {
                self.errors.clone_from(&validation.errors);
                return NavOutcome::Blocked(validation);
            }
        }
        if self.state.set_current_step(step).is_err() {
            return NavOutcome::Unchanged;
        }
        self.errors.clear();
        tracing::debug!(from, to = step, "jumped to step");
        NavOutcome::Moved { from, to: step }
    }

    /// Record an edit. Returns `false` when the form is locked.
    pub fn set_field(&mut self, name: FieldName, value: impl Into<FieldValue>) -> bool {
        if self.locked {
            return false;
        }
        self.errors.retain(|error| error.field != name);
        self.state.set_field(name, value);
        true
    }

    /// Record picked files. A single-file field keeps the first path.
    ///
    /// Returns `false` for a locked form or a field that is not a file picker.
    pub fn attach_files(&mut self, name: FieldName, paths: Vec<String>) -> bool {
        let multiple = match self.schema.field(&name).map(|spec| &spec.kind) {
            Some(FieldKind::File { multiple }) => *multiple,
            _ => return false,
        };
        let value = if multiple {
            FieldValue::List(paths)
        } else {
            FieldValue::Text(paths.into_iter().next().unwrap_or_default())
        };
        self.set_field(name, value)
    }

    /// # Errors
    ///
    /// Returns `WizardError::Submitted` once the form is locked.
    pub fn add_entry(&mut self) -> Result<Ordinal, WizardError> {
        if self.locked {
            return Err(WizardError::Submitted);
        }
        let ordinal = self.state.academic_mut().add_entry();
        tracing::debug!(ordinal = ordinal.value(), "added academic entry");
        Ok(ordinal)
    }

    /// # Errors
    ///
    /// Returns `WizardError::Academic` when the entry is the last one or unknown.
    pub fn remove_entry(&mut self, ordinal: Ordinal) -> Result<AcademicEntry, WizardError> {
        if self.locked {
            return Err(WizardError::Submitted);
        }
        let removed = self.state.academic_mut().remove_entry(ordinal).inspect_err(|err| {
            tracing::debug!(ordinal = ordinal.value(), error = %err, "entry not removed");
        })?;
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns `WizardError::Academic` for an unknown ordinal.
    pub fn update_entry(
        &mut self,
        ordinal: Ordinal,
        field: AcademicField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        if self.locked {
            return Err(WizardError::Submitted);
        }
        self.state.academic_mut().update(ordinal, field, value)?;
        if field == AcademicField::EducationLevel {
            self.errors
                .retain(|error| error.field.as_str() != EDUCATION_LEVEL_FIELD);
        }
        Ok(())
    }

    /// Apply a saved draft over the current state.
    pub fn restore(&mut self, snapshot: &DraftSnapshot) {
        snapshot.restore_into(&mut self.state);
        self.errors.clear();
    }

    #[must_use]
    pub fn view(&self) -> StepView {
        if self.locked {
            StepView::submitted(&self.schema, &self.state)
        } else {
            StepView::project(&self.schema, &self.state)
        }
    }
}
