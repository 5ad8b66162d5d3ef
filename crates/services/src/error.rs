//! Shared error types for the services crate.

use thiserror::Error;

use admissions_core::model::{AcademicHistoryError, DraftSnapshotError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `DraftStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DraftStoreError {
    #[error(transparent)]
    Snapshot(#[from] DraftSnapshotError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted for repeating-entry edits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WizardError {
    #[error("the application has already been submitted")]
    Submitted,
    #[error("the form cannot change while a submission is in flight")]
    SubmissionInFlight,
    #[error(transparent)]
    Academic(#[from] AcademicHistoryError),
}

/// Errors emitted while building a `SubmissionConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionConfigError {
    #[error("submission endpoint is not a valid URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("submission endpoint must use http or https, got {0}")]
    UnsupportedScheme(String),
    #[error("submission timeout must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Failures reported by a `SubmissionTransport`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("response was not valid JSON: {0}")]
    InvalidResponse(String),
    #[error("attachment {path} could not be read: {reason}")]
    Attachment { path: String, reason: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Errors emitted when submitting an application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("{summary} (step {first_invalid_step})")]
    Validation {
        summary: String,
        first_invalid_step: u8,
    },
    #[error("a submission is already in flight")]
    InFlight,
    #[error("the application has already been submitted")]
    AlreadySubmitted,
    #[error("no submission is in flight")]
    NotSubmitting,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{message}")]
    Rejected {
        message: String,
        field_errors: Vec<(String, String)>,
    },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] SubmissionConfigError),
    #[error("submission client could not be built: {0}")]
    HttpClient(String),
}
