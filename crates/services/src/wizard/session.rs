use admissions_core::model::{
    AcademicEntry, AcademicField, FieldName, FieldValue, FormSchema, Ordinal,
};
use admissions_core::validation::{FieldError, SUMMARY_MESSAGE, validate_all};

use super::autosave::{AutosaveDebounce, AutosaveTicket};
use super::controller::{NavOutcome, StepController};
use super::notice::{Notice, NoticeKind, SUBMITTED_MESSAGE};
use super::view::StepView;
use crate::error::{SubmitError, WizardError};
use crate::submission::{SubmissionPayload, SubmissionReceipt, SubmitPhase};

/// One applicant's pass through the form: step controller, submission phase,
/// banner notice and autosave bookkeeping.
///
/// Purely synchronous; `ApplicationWorkflow` drives the async edges. Edits,
/// navigation and resets are refused while a submission is in flight.
#[derive(Debug, Clone)]
pub struct WizardSession {
    controller: StepController,
    phase: SubmitPhase,
    notice: Option<Notice>,
    autosave: AutosaveDebounce,
    receipt: Option<SubmissionReceipt>,
}

impl WizardSession {
    #[must_use]
    pub fn new(schema: FormSchema) -> Self {
        Self::from_controller(StepController::new(schema))
    }

    #[must_use]
    pub fn from_controller(controller: StepController) -> Self {
        Self {
            controller,
            phase: SubmitPhase::default(),
            notice: None,
            autosave: AutosaveDebounce::default(),
            receipt: None,
        }
    }

    #[must_use]
    pub fn with_autosave(mut self, autosave: AutosaveDebounce) -> Self {
        self.autosave = autosave;
        self
    }

    #[must_use]
    pub fn controller(&self) -> &StepController {
        &self.controller
    }

    #[must_use]
    pub fn view(&self) -> StepView {
        self.controller.view()
    }

    #[must_use]
    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    /// The backend's acceptance, once submitted.
    #[must_use]
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        self.phase.button_label()
    }

    #[must_use]
    pub fn submit_disabled(&self) -> bool {
        self.phase.is_submitting()
    }

    // ─── Notices ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Dismiss only if `notice` is still the one showing; used by hide timers.
    pub fn expire_notice(&mut self, notice: &Notice) {
        if self.notice.as_ref() == Some(notice) {
            self.notice = None;
        }
    }

    // ─── Edits ─────────────────────────────────────────────────────────────

    /// Record an edit. Returns `false` when the form is frozen.
    pub fn set_field(&mut self, name: FieldName, value: impl Into<FieldValue>) -> bool {
        !self.phase.is_submitting() && self.controller.set_field(name, value)
    }

    /// Record files picked for a file field. Returns `false` when refused.
    pub fn attach_files(&mut self, name: FieldName, paths: Vec<String>) -> bool {
        !self.phase.is_submitting() && self.controller.attach_files(name, paths)
    }

    /// # Errors
    ///
    /// Returns `WizardError::SubmissionInFlight` or `Submitted` when frozen.
    pub fn add_entry(&mut self) -> Result<Ordinal, WizardError> {
        self.ensure_editable()?;
        self.controller.add_entry()
    }

    /// # Errors
    ///
    /// Returns `WizardError::Academic` for the last or an unknown entry, or a
    /// frozen-form error.
    pub fn remove_entry(&mut self, ordinal: Ordinal) -> Result<AcademicEntry, WizardError> {
        self.ensure_editable()?;
        self.controller.remove_entry(ordinal)
    }

    /// # Errors
    ///
    /// Returns `WizardError::Academic` for an unknown entry, or a frozen-form error.
    pub fn update_entry(
        &mut self,
        ordinal: Ordinal,
        field: AcademicField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.controller.update_entry(ordinal, field, value)
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.phase.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        Ok(())
    }

    /// Throw away everything entered and return to a blank first step.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::InFlight` while a submission is outstanding and
    /// `AlreadySubmitted` once it has landed.
    pub fn reset(&mut self) -> Result<(), SubmitError> {
        match self.phase {
            SubmitPhase::Submitting => return Err(SubmitError::InFlight),
            SubmitPhase::Submitted(_) => return Err(SubmitError::AlreadySubmitted),
            SubmitPhase::Idle { .. } => {}
        }
        let schema = self.controller.schema().clone();
        self.controller = StepController::new(schema);
        self.phase = SubmitPhase::default();
        self.notice = None;
        self.receipt = None;
        self.autosave.cancel();
        tracing::info!("form reset to a blank first step");
        Ok(())
    }

    // ─── Navigation ────────────────────────────────────────────────────────

    /// Validate and advance. A move drops any pending debounced save, since
    /// the caller saves straight away.
    pub fn go_next(&mut self) -> NavOutcome {
        if self.phase.is_submitting() {
            return NavOutcome::Unchanged;
        }
        let outcome = self.controller.go_next();
        if outcome.moved() {
            self.autosave.cancel();
        }
        self.after_navigation(&outcome);
        outcome
    }

    pub fn go_prev(&mut self) -> NavOutcome {
        if self.phase.is_submitting() {
            return NavOutcome::Unchanged;
        }
        let outcome = self.controller.go_prev();
        self.after_navigation(&outcome);
        outcome
    }

    pub fn jump_to(&mut self, step: u8) -> NavOutcome {
        if self.phase.is_submitting() {
            return NavOutcome::Unchanged;
        }
        let outcome = self.controller.jump_to(step);
        self.after_navigation(&outcome);
        outcome
    }

    fn after_navigation(&mut self, outcome: &NavOutcome) {
        match outcome {
            NavOutcome::Blocked(validation) => {
                if let Some(summary) = validation.summary() {
                    self.notice = Some(Notice::error(summary));
                }
            }
            NavOutcome::Moved { .. } => {
                if self
                    .notice
                    .as_ref()
                    .is_some_and(|notice| notice.kind == NoticeKind::Error)
                {
                    self.notice = None;
                }
            }
            NavOutcome::Unchanged => {}
        }
    }

    // ─── Autosave ──────────────────────────────────────────────────────────

    /// Take a ticket for a debounced save; callers wait `autosave_delay` first.
    pub fn schedule_autosave(&mut self) -> AutosaveTicket {
        self.autosave.schedule()
    }

    #[must_use]
    pub fn autosave_delay(&self) -> std::time::Duration {
        self.autosave.delay()
    }

    /// Whether a debounced save with `ticket` should still run.
    #[must_use]
    pub fn autosave_due(&self, ticket: AutosaveTicket) -> bool {
        self.autosave.is_current(ticket) && !self.controller.is_locked()
    }

    /// Drop any pending debounced save, e.g. after saving immediately.
    pub fn cancel_autosave(&mut self) {
        self.autosave.cancel();
    }

    // ─── Submission ────────────────────────────────────────────────────────

    /// Validate every step and, if clean, enter `Submitting` with the payload to send.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::InFlight` / `AlreadySubmitted` when the phase forbids
    /// it, or `SubmitError::Validation` when any step is invalid. The wizard
    /// state, including the current step, is left as it was.
    pub fn begin_submission(&mut self) -> Result<SubmissionPayload, SubmitError> {
        match self.phase {
            SubmitPhase::Submitting => return Err(SubmitError::InFlight),
            SubmitPhase::Submitted(_) => return Err(SubmitError::AlreadySubmitted),
            SubmitPhase::Idle { .. } => {}
        }

        let schema = self.controller.schema();
        let state = self.controller.state();
        let validation = validate_all(schema, state);
        if let Some(first_invalid_step) = validation.first_invalid_step() {
            let errors: Vec<FieldError> = validation.errors().cloned().collect();
            let summary = format!(
                "{SUMMARY_MESSAGE}. Check step {first_invalid_step}: {}.",
                schema.title(first_invalid_step)
            );
            tracing::debug!(first_invalid_step, errors = errors.len(), "submission blocked");
            self.controller.show_errors(errors);
            self.notice = Some(Notice::error(summary.clone()));
            self.phase = SubmitPhase::Idle {
                last_error: Some(summary.clone()),
            };
            return Err(SubmitError::Validation {
                summary,
                first_invalid_step,
            });
        }

        let payload = SubmissionPayload::build(schema, state);
        self.phase = SubmitPhase::Submitting;
        self.cancel_autosave();
        Ok(payload)
    }

    /// Settle an in-flight submission with the transport's verdict.
    ///
    /// # Errors
    ///
    /// Passes a failed `result` through after returning the phase to `Idle`;
    /// returns `SubmitError::NotSubmitting` if nothing was in flight.
    pub fn finish_submission(
        &mut self,
        result: Result<SubmissionReceipt, SubmitError>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        if !self.phase.is_submitting() {
            return Err(SubmitError::NotSubmitting);
        }
        match result {
            Ok(receipt) => {
                tracing::info!(
                    application_id = %receipt.application_id,
                    "application submitted"
                );
                let message = receipt.message.clone().unwrap_or_else(|| {
                    format!(
                        "{SUBMITTED_MESSAGE}. Your application ID is {}.",
                        receipt.application_id
                    )
                });
                self.phase = SubmitPhase::Submitted(receipt.application_id.clone());
                self.controller.lock();
                self.notice = Some(Notice::success(message));
                self.receipt = Some(receipt.clone());
                Ok(receipt)
            }
            Err(err) => {
                let message = err.user_message();
                tracing::warn!(error = %err, "submission failed");
                if let SubmitError::Rejected { field_errors, .. } = &err {
                    let inline = field_errors
                        .iter()
                        .filter_map(|(field, message)| {
                            FieldName::new(field.as_str()).ok().map(|field| FieldError {
                                field,
                                message: message.clone(),
                            })
                        })
                        .collect();
                    self.controller.show_errors(inline);
                }
                self.phase = SubmitPhase::Idle {
                    last_error: Some(message.clone()),
                };
                self.notice = Some(Notice::error(message));
                Err(err)
            }
        }
    }
}

/// Where a `WizardSession` lives between awaits.
///
/// `ApplicationWorkflow` reaches the session only through short synchronous
/// closures, so UI state cells can hand it over without holding a borrow
/// across a request.
pub trait SessionSlot {
    /// Run `apply` against the open session. `None` when there is none.
    fn with_session<R>(&mut self, apply: impl FnOnce(&mut WizardSession) -> R) -> Option<R>;
}

impl SessionSlot for WizardSession {
    fn with_session<R>(&mut self, apply: impl FnOnce(&mut WizardSession) -> R) -> Option<R> {
        Some(apply(self))
    }
}
