#![forbid(unsafe_code)]

pub mod app_services;
pub mod draft_store;
pub mod error;
pub mod submission;
pub mod wizard;

pub use admissions_core::Clock;

pub use app_services::AppServices;
pub use draft_store::{DRAFT_KEY, DraftStore};
pub use error::{
    AppServicesError, DraftStoreError, SubmissionConfigError, SubmitError, TransportError,
    WizardError,
};
pub use submission::{
    Attachment, HttpTransport, SubmissionClient, SubmissionConfig, SubmissionPayload, SubmissionReceipt,
    SubmissionResponse, SubmissionTransport, SubmitPhase,
};
pub use wizard::{
    ApplicationWorkflow, AutosaveTicket, NavOutcome, Notice, NoticeKind, SessionSlot,
    StepController, StepIndicator, StepStatus, StepView, WizardSession,
};
