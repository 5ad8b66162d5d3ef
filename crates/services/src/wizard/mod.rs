mod autosave;
mod controller;
mod notice;
mod session;
mod view;
mod workflow;

// Public API of the wizard subsystem.
pub use autosave::{AUTOSAVE_DEBOUNCE, AutosaveDebounce, AutosaveTicket};
pub use controller::{NavOutcome, StepController};
pub use notice::{
    INFO_NOTICE_TTL, NETWORK_ERROR_MESSAGE, Notice, NoticeKind, RESTORED_MESSAGE,
    SERVER_ERROR_MESSAGE, SUBMITTED_MESSAGE,
};
pub use session::{SessionSlot, WizardSession};
pub use view::{StepIndicator, StepStatus, StepView};
pub use workflow::ApplicationWorkflow;
