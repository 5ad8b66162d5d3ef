use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::academic::{AcademicEntry, AcademicHistory};
use crate::model::field::{FieldName, FieldValue};
use crate::model::wizard::WizardState;

/// Drafts older than this are discarded instead of restored.
pub const DRAFT_TTL_HOURS: i64 = 24;

const SNAPSHOT_VERSION: u32 = 1;

#[must_use]
pub fn draft_ttl() -> Duration {
    Duration::hours(DRAFT_TTL_HOURS)
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DraftSnapshotError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("unsupported draft version {0}")]
    UnsupportedVersion(u32),

    #[error("draft declares {declared} academic entries but holds {actual}")]
    CountMismatch { declared: usize, actual: usize },

    #[error("draft step must be at least 1")]
    InvalidStep,
}

/// Saved copy of an in-progress application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    version: u32,
    field_values: BTreeMap<FieldName, FieldValue>,
    current_step: u8,
    repeating_section_count: usize,
    academic_entries: Vec<AcademicEntry>,
    saved_at_millis: i64,
}

impl DraftSnapshot {
    #[must_use]
    pub fn capture(state: &WizardState, saved_at: DateTime<Utc>) -> Self {
        let academic_entries = state.academic().records();
        Self {
            version: SNAPSHOT_VERSION,
            field_values: state.field_values().clone(),
            current_step: state.current_step(),
            repeating_section_count: academic_entries.len(),
            academic_entries,
            saved_at_millis: saved_at.timestamp_millis(),
        }
    }

    #[must_use]
    pub fn field_values(&self) -> &BTreeMap<FieldName, FieldValue> {
        &self.field_values
    }

    #[must_use]
    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    #[must_use]
    pub fn repeating_section_count(&self) -> usize {
        self.repeating_section_count
    }

    #[must_use]
    pub fn academic_entries(&self) -> &[AcademicEntry] {
        &self.academic_entries
    }

    #[must_use]
    pub fn saved_at_millis(&self) -> i64 {
        self.saved_at_millis
    }

    /// Strictly older than the TTL. A draft exactly 24h old is still usable.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age_millis = now.timestamp_millis().saturating_sub(self.saved_at_millis);
        age_millis > draft_ttl().num_milliseconds()
    }

    /// # Errors
    ///
    /// Returns `DraftSnapshotError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, DraftSnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and sanity-check a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DraftSnapshotError` for malformed JSON, an unknown version,
    /// a step of zero, or an entry count that disagrees with the entries.
    pub fn from_json(raw: &str) -> Result<Self, DraftSnapshotError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DraftSnapshotError::UnsupportedVersion(snapshot.version));
        }
        if snapshot.current_step == 0 {
            return Err(DraftSnapshotError::InvalidStep);
        }
        if snapshot.repeating_section_count != snapshot.academic_entries.len() {
            return Err(DraftSnapshotError::CountMismatch {
                declared: snapshot.repeating_section_count,
                actual: snapshot.academic_entries.len(),
            });
        }
        Ok(snapshot)
    }

    /// Apply the snapshot onto `state`. The step is clamped into the state's range.
    pub fn restore_into(&self, state: &mut WizardState) {
        state.replace_field_values(self.field_values.clone());
        state.replace_academic(AcademicHistory::restore(self.academic_entries.clone()));
        let step = self.current_step.clamp(1, state.total_steps());
        // Clamped above, so this cannot fail.
        let _ = state.set_current_step(step);
    }
}
