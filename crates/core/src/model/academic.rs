use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::Ordinal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AcademicHistoryError {
    #[error("at least one academic entry must remain")]
    LastEntry,

    #[error("no academic entry with ordinal {0}")]
    NotFound(Ordinal),
}

/// Columns of one academic entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcademicField {
    EducationLevel,
    Institution,
    FieldOfStudy,
    GraduationYear,
    Gpa,
}

impl AcademicField {
    pub const ALL: [AcademicField; 5] = [
        AcademicField::EducationLevel,
        AcademicField::Institution,
        AcademicField::FieldOfStudy,
        AcademicField::GraduationYear,
        AcademicField::Gpa,
    ];

    /// Repeated form key the backend reads the column from.
    #[must_use]
    pub fn form_key(self) -> &'static str {
        match self {
            AcademicField::EducationLevel => "educationLevel[]",
            AcademicField::Institution => "institution[]",
            AcademicField::FieldOfStudy => "fieldOfStudy[]",
            AcademicField::GraduationYear => "graduationYear[]",
            AcademicField::Gpa => "gpa[]",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AcademicField::EducationLevel => "Education level",
            AcademicField::Institution => "Institution",
            AcademicField::FieldOfStudy => "Field of study",
            AcademicField::GraduationYear => "Graduation year",
            AcademicField::Gpa => "GPA / grade (optional)",
        }
    }
}

/// Education levels offered in the entry's select.
pub const EDUCATION_LEVELS: [&str; 5] = [
    "high_school",
    "diploma",
    "bachelor",
    "master",
    "doctorate",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicEntry {
    ordinal: Ordinal,
    education_level: String,
    institution: String,
    field_of_study: String,
    graduation_year: String,
    #[serde(default)]
    gpa: Option<String>,
}

impl AcademicEntry {
    #[must_use]
    pub fn blank(ordinal: Ordinal) -> Self {
        Self {
            ordinal,
            education_level: String::new(),
            institution: String::new(),
            field_of_study: String::new(),
            graduation_year: String::new(),
            gpa: None,
        }
    }

    #[must_use]
    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    #[must_use]
    pub fn get(&self, field: AcademicField) -> &str {
        match field {
            AcademicField::EducationLevel => &self.education_level,
            AcademicField::Institution => &self.institution,
            AcademicField::FieldOfStudy => &self.field_of_study,
            AcademicField::GraduationYear => &self.graduation_year,
            AcademicField::Gpa => self.gpa.as_deref().unwrap_or(""),
        }
    }

    pub fn set(&mut self, field: AcademicField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AcademicField::EducationLevel => self.education_level = value,
            AcademicField::Institution => self.institution = value,
            AcademicField::FieldOfStudy => self.field_of_study = value,
            AcademicField::GraduationYear => self.graduation_year = value,
            AcademicField::Gpa => {
                self.gpa = Some(value).filter(|gpa| !gpa.trim().is_empty());
            }
        }
    }

    #[must_use]
    pub fn has_education_level(&self) -> bool {
        !self.education_level.trim().is_empty()
    }
}

/// The repeating academic-history section.
///
/// Entries are addressed by ordinal, never by position, and the section
/// refuses to drop its last entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcademicHistory {
    entries: Vec<AcademicEntry>,
    next_ordinal: u32,
}

impl Default for AcademicHistory {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_ordinal: 1,
        }
    }
}

impl AcademicHistory {
    /// A section holding the single blank entry the form opens with.
    #[must_use]
    pub fn with_first_entry() -> Self {
        let mut history = Self::default();
        history.add_entry();
        history
    }

    /// Rebuild from saved entries. Later additions continue after the highest ordinal.
    #[must_use]
    pub fn restore(entries: Vec<AcademicEntry>) -> Self {
        if entries.is_empty() {
            return Self::with_first_entry();
        }
        let next_ordinal = entries
            .iter()
            .map(|entry| entry.ordinal.value())
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self {
            entries,
            next_ordinal,
        }
    }

    pub fn add_entry(&mut self) -> Ordinal {
        let ordinal = Ordinal::new(self.next_ordinal);
        self.next_ordinal = self.next_ordinal.saturating_add(1);
        self.entries.push(AcademicEntry::blank(ordinal));
        ordinal
    }

    /// # Errors
    ///
    /// Returns `AcademicHistoryError::LastEntry` when only one entry is left, or
    /// `NotFound` for an unknown ordinal. Nothing changes in either case.
    pub fn remove_entry(&mut self, ordinal: Ordinal) -> Result<AcademicEntry, AcademicHistoryError> {
        let index = self
            .position(ordinal)
            .ok_or(AcademicHistoryError::NotFound(ordinal))?;
        if self.entries.len() <= 1 {
            return Err(AcademicHistoryError::LastEntry);
        }
        Ok(self.entries.remove(index))
    }

    /// # Errors
    ///
    /// Returns `AcademicHistoryError::NotFound` for an unknown ordinal.
    pub fn update(
        &mut self,
        ordinal: Ordinal,
        field: AcademicField,
        value: impl Into<String>,
    ) -> Result<(), AcademicHistoryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.ordinal == ordinal)
            .ok_or(AcademicHistoryError::NotFound(ordinal))?;
        entry.set(field, value);
        Ok(())
    }

    #[must_use]
    pub fn entry(&self, ordinal: Ordinal) -> Option<&AcademicEntry> {
        self.entries.iter().find(|entry| entry.ordinal == ordinal)
    }

    #[must_use]
    pub fn entries(&self) -> &[AcademicEntry] {
        &self.entries
    }

    /// Ordered copy for submission or draft save.
    #[must_use]
    pub fn records(&self) -> Vec<AcademicEntry> {
        self.entries.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based position shown as "Academic Entry #n"; shifts as entries are removed.
    #[must_use]
    pub fn display_number(&self, ordinal: Ordinal) -> Option<usize> {
        self.position(ordinal).map(|index| index + 1)
    }

    #[must_use]
    pub fn can_remove(&self) -> bool {
        self.entries.len() > 1
    }

    #[must_use]
    pub fn has_education_level(&self) -> bool {
        self.entries.iter().any(AcademicEntry::has_education_level)
    }

    #[must_use]
    pub fn add_button_label(&self) -> String {
        if self.entries.len() > 1 {
            format!("+ Add Another Academic Entry ({} added)", self.entries.len())
        } else {
            "+ Add Another Academic Entry".to_string()
        }
    }

    fn position(&self, ordinal: Ordinal) -> Option<usize> {
        self.entries.iter().position(|entry| entry.ordinal == ordinal)
    }
}
