use admissions_core::model::{FormSchema, WizardState};

use super::controller::{NavOutcome, StepController};
use super::notice::{Notice, RESTORED_MESSAGE};
use super::session::{SessionSlot, WizardSession};
use crate::draft_store::DraftStore;
use crate::error::SubmitError;
use crate::submission::{SubmissionClient, SubmissionPayload, SubmissionReceipt};

/// Async edges of the wizard: draft restore and autosave, and delivery of
/// the submission.
///
/// Every operation that spans an await takes a `SessionSlot` and touches the
/// session only between awaits.
#[derive(Clone)]
pub struct ApplicationWorkflow {
    schema: FormSchema,
    drafts: DraftStore,
    submitter: SubmissionClient,
}

impl ApplicationWorkflow {
    #[must_use]
    pub fn new(schema: FormSchema, drafts: DraftStore, submitter: SubmissionClient) -> Self {
        Self {
            schema,
            drafts,
            submitter,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    #[must_use]
    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// Open the form, restoring a usable draft if one is stored.
    pub async fn start(&self) -> WizardSession {
        let mut controller = StepController::new(self.schema.clone());
        let Some(snapshot) = self.drafts.load().await else {
            return WizardSession::from_controller(controller);
        };
        controller.restore(&snapshot);
        tracing::info!(
            step = controller.current_step(),
            entries = snapshot.repeating_section_count(),
            "restored draft"
        );
        let mut session = WizardSession::from_controller(controller);
        session.set_notice(Notice::info(RESTORED_MESSAGE));
        session
    }

    /// Blank the form and discard the stored draft.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::InFlight` while a submission is outstanding; the
    /// form and draft are left alone.
    pub async fn start_over(&self, slot: &mut impl SessionSlot) -> Result<(), SubmitError> {
        slot.with_session(WizardSession::reset)
            .unwrap_or(Ok(()))
            .inspect_err(|err| tracing::debug!(error = %err, "start over refused"))?;
        if let Err(err) = self.drafts.clear().await {
            tracing::warn!(error = %err, "failed to clear draft");
        }
        Ok(())
    }

    /// Best-effort save; failures are logged and otherwise ignored.
    pub async fn autosave(&self, state: &WizardState) {
        if let Err(err) = self.drafts.save(state).await {
            tracing::warn!(error = %err, "autosave failed");
        }
    }

    /// Validate and advance; a successful move is saved immediately.
    pub async fn go_next(&self, slot: &mut impl SessionSlot) -> NavOutcome {
        let Some((outcome, moved_to)) = slot.with_session(|session| {
            let outcome = session.go_next();
            let state = outcome
                .moved()
                .then(|| session.controller().state().clone());
            (outcome, state)
        }) else {
            return NavOutcome::Unchanged;
        };
        if let Some(state) = moved_to {
            self.autosave(&state).await;
        }
        outcome
    }

    /// Full submission: validate, send, settle, and drop the draft on success.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` for refused, invalid, failed or rejected submissions.
    pub async fn submit(
        &self,
        slot: &mut impl SessionSlot,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let payload = slot
            .with_session(WizardSession::begin_submission)
            .unwrap_or(Err(SubmitError::NotSubmitting))?;
        self.settle(slot, &payload).await
    }

    /// Send a payload taken from `WizardSession::begin_submission` and settle
    /// the session with the outcome. Callers that must flip the session into
    /// `Submitting` before yielding use this directly.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Transport` or `SubmitError::Rejected`, or
    /// `SubmitError::NotSubmitting` if the session is gone.
    pub async fn settle(
        &self,
        slot: &mut impl SessionSlot,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let result = self.submitter.deliver(payload).await;
        let receipt = slot
            .with_session(|session| session.finish_submission(result))
            .unwrap_or(Err(SubmitError::NotSubmitting))?;
        if let Err(err) = self.drafts.clear().await {
            tracing::warn!(error = %err, "failed to clear draft after submission");
        }
        Ok(receipt)
    }
}
