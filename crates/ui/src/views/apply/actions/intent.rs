use admissions_core::model::{AcademicField, Ordinal};

#[derive(Clone, Debug, PartialEq)]
pub enum ApplyIntent {
    Next,
    Prev,
    JumpTo(u8),
    SetText(String, String),
    SetFlag(String, bool),
    /// Paths picked for a file field; an empty pick clears it.
    AttachFiles(String, Vec<String>),
    AddEntry,
    RemoveEntry(Ordinal),
    UpdateEntry(Ordinal, AcademicField, String),
    Submit,
    DismissNotice,
    StartOver,
}
