use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::academic::AcademicHistory;
use crate::model::field::{FieldName, FieldValue};
use crate::model::schema::FormSchema;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WizardStateError {
    #[error("a wizard needs at least one step")]
    NoSteps,

    #[error("step {step} is outside 1..={total}")]
    StepOutOfRange { step: u8, total: u8 },
}

/// Everything the applicant has entered plus where they are in the form.
///
/// Invariant: `1 <= current_step <= total_steps`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardState {
    current_step: u8,
    total_steps: u8,
    field_values: BTreeMap<FieldName, FieldValue>,
    academic: AcademicHistory,
}

impl WizardState {
    /// # Errors
    ///
    /// Returns `WizardStateError::NoSteps` if `total_steps` is zero.
    pub fn new(total_steps: u8) -> Result<Self, WizardStateError> {
        if total_steps == 0 {
            return Err(WizardStateError::NoSteps);
        }
        Ok(Self {
            current_step: 1,
            total_steps,
            field_values: BTreeMap::new(),
            academic: AcademicHistory::with_first_entry(),
        })
    }

    /// Fresh state sized for `schema`, on step 1 with one blank academic entry.
    #[must_use]
    pub fn for_schema(schema: &FormSchema) -> Self {
        Self {
            current_step: 1,
            total_steps: schema.total_steps().max(1),
            field_values: BTreeMap::new(),
            academic: AcademicHistory::with_first_entry(),
        }
    }

    #[must_use]
    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    #[must_use]
    pub fn total_steps(&self) -> u8 {
        self.total_steps
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.current_step == 1
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// `(current - 1) / (total - 1) * 100`; a single-step form reports 0.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.total_steps < 2 {
            return 0.0;
        }
        f64::from(self.current_step - 1) / f64::from(self.total_steps - 1) * 100.0
    }

    /// Progress rounded for the percentage label.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn progress_label(&self) -> u8 {
        // 0..=100 always fits.
        self.progress_percent().round().clamp(0.0, 100.0) as u8
    }

    /// # Errors
    ///
    /// Returns `WizardStateError::StepOutOfRange` if `step` is not in `1..=total_steps`.
    pub fn set_current_step(&mut self, step: u8) -> Result<(), WizardStateError> {
        if step == 0 || step > self.total_steps {
            return Err(WizardStateError::StepOutOfRange {
                step,
                total: self.total_steps,
            });
        }
        self.current_step = step;
        Ok(())
    }

    /// Moves one step forward unless already on the last step.
    pub fn advance(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        self.current_step += 1;
        true
    }

    /// Moves one step back unless already on step 1.
    pub fn retreat(&mut self) -> bool {
        if self.is_first_step() {
            return false;
        }
        self.current_step -= 1;
        true
    }

    #[must_use]
    pub fn field(&self, name: &FieldName) -> Option<&FieldValue> {
        self.field_values.get(name)
    }

    /// Text of a field, or `""` when unset or not text.
    #[must_use]
    pub fn text(&self, name: &FieldName) -> &str {
        self.field(name).and_then(FieldValue::as_text).unwrap_or("")
    }

    #[must_use]
    pub fn is_checked(&self, name: &FieldName) -> bool {
        self.field(name).is_some_and(FieldValue::is_checked)
    }

    pub fn set_field(&mut self, name: FieldName, value: impl Into<FieldValue>) {
        self.field_values.insert(name, value.into());
    }

    pub fn clear_field(&mut self, name: &FieldName) -> Option<FieldValue> {
        self.field_values.remove(name)
    }

    #[must_use]
    pub fn field_values(&self) -> &BTreeMap<FieldName, FieldValue> {
        &self.field_values
    }

    pub(crate) fn replace_field_values(&mut self, values: BTreeMap<FieldName, FieldValue>) {
        self.field_values = values;
    }

    #[must_use]
    pub fn academic(&self) -> &AcademicHistory {
        &self.academic
    }

    pub fn academic_mut(&mut self) -> &mut AcademicHistory {
        &mut self.academic
    }

    pub(crate) fn replace_academic(&mut self, academic: AcademicHistory) {
        self.academic = academic;
    }

    #[must_use]
    pub fn repeating_section_count(&self) -> usize {
        self.academic.len()
    }
}
