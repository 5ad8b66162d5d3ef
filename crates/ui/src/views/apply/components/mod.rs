mod academic;
mod fields;
mod footer;
mod progress;
mod review;

pub use academic::AcademicEntries;
pub use fields::FieldRow;
pub use footer::{NoticeBanner, SubmittedPanel, WizardNav};
pub use progress::ProgressHeader;
pub use review::ReviewPanel;
