mod label_fmt;
mod wizard_vm;

pub use label_fmt::humanize_option;
pub use wizard_vm::{
    AcademicEntryVm, AcademicSectionVm, ChoiceOptionVm, FieldInputVm, FieldVm, NoticeVm,
    ReviewSectionVm, WizardVm, map_wizard,
};
