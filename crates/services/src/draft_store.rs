use std::sync::Arc;

use admissions_core::model::{DraftSnapshot, WizardState};
use storage::repository::KeyValueStore;

use crate::Clock;
use crate::error::DraftStoreError;

/// Key the in-progress application is cached under.
pub const DRAFT_KEY: &str = "admissions.application.draft";

/// Saves and restores the applicant's draft through a key-value store.
#[derive(Clone)]
pub struct DraftStore {
    clock: Clock,
    kv: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    #[must_use]
    pub fn new(clock: Clock, kv: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, kv }
    }

    /// Snapshot `state` stamped with the current time, replacing any prior draft.
    ///
    /// # Errors
    ///
    /// Returns `DraftStoreError` if serialization or the write fails.
    pub async fn save(&self, state: &WizardState) -> Result<(), DraftStoreError> {
        let snapshot = DraftSnapshot::capture(state, self.clock.now());
        let raw = snapshot.to_json()?;
        self.kv.put(DRAFT_KEY, &raw).await?;
        tracing::debug!(
            step = snapshot.current_step(),
            entries = snapshot.repeating_section_count(),
            "draft saved"
        );
        Ok(())
    }

    /// Load a usable draft.
    ///
    /// Absent, unreadable, corrupt and expired drafts all yield `None`; corrupt
    /// and expired values are deleted on the way out.
    pub async fn load(&self) -> Option<DraftSnapshot> {
        let raw = match self.kv.get(DRAFT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "draft store unreadable, starting fresh");
                return None;
            }
        };

        let snapshot = match DraftSnapshot::from_json(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt draft");
                self.discard().await;
                return None;
            }
        };

        if snapshot.is_expired(self.clock.now()) {
            tracing::warn!(
                saved_at_millis = snapshot.saved_at_millis(),
                "discarding expired draft"
            );
            self.discard().await;
            return None;
        }

        Some(snapshot)
    }

    /// Delete the stored draft. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `DraftStoreError::Storage` if the delete fails.
    pub async fn clear(&self) -> Result<bool, DraftStoreError> {
        Ok(self.kv.remove(DRAFT_KEY).await?)
    }

    async fn discard(&self) {
        if let Err(err) = self.kv.remove(DRAFT_KEY).await {
            tracing::warn!(error = %err, "failed to delete unusable draft");
        }
    }
}
