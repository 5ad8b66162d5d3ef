use thiserror::Error;

use crate::model::field::FieldName;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("a form needs at least one step")]
    NoSteps,

    #[error("a form cannot have more than {max} steps")]
    TooManySteps { max: usize },

    #[error("step {found} is out of order, expected step {expected}")]
    StepOutOfOrder { expected: u8, found: u8 },

    #[error("field {0} is declared more than once")]
    DuplicateField(FieldName),
}

//
// ─── FIELD SPECS ───────────────────────────────────────────────────────────────
//

/// What kind of control a field is rendered as, which decides how it validates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Date,
    LongText,
    /// A select or radio group. Values outside `options` count as unselected.
    Choice(Vec<String>),
    Checkbox,
    /// A file picker. Values are local paths; `multiple` fields hold a list.
    File { multiple: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    #[must_use]
    pub fn required(name: FieldName, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name,
            label: label.into(),
            kind,
            required: true,
        }
    }

    #[must_use]
    pub fn optional(name: FieldName, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name,
            label: label.into(),
            kind,
            required: false,
        }
    }
}

/// Business rules checked on top of per-field requirements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepRule {
    /// At least one academic entry must have an education level selected.
    AcademicHistory,
    /// The named file field must have something attached.
    Attachment { field: FieldName, message: String },
    /// The named checkbox must be ticked.
    Consent { field: FieldName, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepSpec {
    pub number: u8,
    pub title: String,
    pub fields: Vec<FieldSpec>,
    pub rules: Vec<StepRule>,
}

impl StepSpec {
    #[must_use]
    pub fn new(number: u8, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            fields: Vec::new(),
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: StepRule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn has_academic_history(&self) -> bool {
        self.rules.contains(&StepRule::AcademicHistory)
    }
}

//
// ─── SCHEMA ────────────────────────────────────────────────────────────────────
//

/// Ordered steps of the application form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSchema {
    steps: Vec<StepSpec>,
}

impl FormSchema {
    /// # Errors
    ///
    /// Returns `SchemaError` if there are no steps, steps are not numbered
    /// `1..=N` in order, or a field name repeats.
    pub fn new(steps: Vec<StepSpec>) -> Result<Self, SchemaError> {
        if steps.is_empty() {
            return Err(SchemaError::NoSteps);
        }
        if steps.len() > usize::from(u8::MAX) {
            return Err(SchemaError::TooManySteps {
                max: usize::from(u8::MAX),
            });
        }

        let mut seen = std::collections::BTreeSet::new();
        for (index, step) in steps.iter().enumerate() {
            // Bounded by the length check above.
            let expected = u8::try_from(index + 1).unwrap_or(u8::MAX);
            if step.number != expected {
                return Err(SchemaError::StepOutOfOrder {
                    expected,
                    found: step.number,
                });
            }
            for field in &step.fields {
                if !seen.insert(field.name.clone()) {
                    return Err(SchemaError::DuplicateField(field.name.clone()));
                }
            }
        }

        Ok(Self { steps })
    }

    /// The five-step admissions application.
    #[must_use]
    pub fn admissions() -> Self {
        Self {
            steps: vec![
                personal_step(),
                academic_step(),
                course_step(),
                documents_step(),
                review_step(),
            ],
        }
    }

    #[must_use]
    pub fn total_steps(&self) -> u8 {
        u8::try_from(self.steps.len()).unwrap_or(u8::MAX)
    }

    #[must_use]
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    #[must_use]
    pub fn step(&self, number: u8) -> Option<&StepSpec> {
        let index = usize::from(number).checked_sub(1)?;
        self.steps.get(index)
    }

    #[must_use]
    pub fn title(&self, number: u8) -> &str {
        self.step(number).map_or("", |step| step.title.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }

    #[must_use]
    pub fn field(&self, name: &FieldName) -> Option<&FieldSpec> {
        self.fields().find(|spec| &spec.name == name)
    }

    /// Step that hosts the repeating academic entries, if any.
    #[must_use]
    pub fn academic_step(&self) -> Option<u8> {
        self.steps
            .iter()
            .find(|step| step.has_academic_history())
            .map(|step| step.number)
    }

    /// Required by its field declaration or by a step rule. Drives the asterisk in the UI.
    #[must_use]
    pub fn is_mandatory(&self, name: &FieldName) -> bool {
        self.steps.iter().any(|step| {
            step.fields
                .iter()
                .any(|field| &field.name == name && field.required)
                || step.rules.iter().any(|rule| match rule {
                    StepRule::Attachment { field, .. } | StepRule::Consent { field, .. } => {
                        field == name
                    }
                    StepRule::AcademicHistory => false,
                })
        })
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::admissions()
    }
}

/// Control names shared with the admissions backend.
pub mod names {
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    pub const GENDER: &str = "gender";
    pub const NATIONALITY: &str = "nationality";
    pub const ADDRESS_LINE1: &str = "address_line1";
    pub const CITY: &str = "city";
    pub const COUNTRY: &str = "country";

    pub const LANGUAGE_SKILL: &str = "language_skill";
    pub const LANGUAGE_SCORE: &str = "language_score";

    pub const PROGRAM: &str = "program";
    pub const DEGREE_LEVEL: &str = "degree_level";
    pub const STUDY_MODE: &str = "study_mode";
    pub const INTAKE: &str = "intake";
    pub const SCHOLARSHIP: &str = "scholarship";

    pub const TRANSCRIPTS: &str = "transcripts";
    pub const PERSONAL_STATEMENT_FILE: &str = "personal_statement_file";
    pub const ADDITIONAL_FILES: &str = "additional_files";

    pub const HOW_DID_YOU_HEAR: &str = "how_did_you_hear";
    pub const DECLARATION: &str = "declaration";
    pub const PRIVACY: &str = "privacy";
    pub const MARKETING_CONSENT: &str = "marketing_consent";
}

fn options(values: &[&str]) -> FieldKind {
    FieldKind::Choice(values.iter().map(|value| (*value).to_string()).collect())
}

fn personal_step() -> StepSpec {
    use FieldSpec as F;
    StepSpec::new(1, "Personal Information")
        .field(F::required(FieldName::known(names::FIRST_NAME), "First name", FieldKind::Text))
        .field(F::required(FieldName::known(names::LAST_NAME), "Last name", FieldKind::Text))
        .field(F::required(FieldName::known(names::EMAIL), "Email", FieldKind::Email))
        .field(F::required(FieldName::known(names::PHONE), "Phone", FieldKind::Phone))
        .field(F::required(
            FieldName::known(names::DATE_OF_BIRTH),
            "Date of birth",
            FieldKind::Date,
        ))
        .field(F::required(
            FieldName::known(names::GENDER),
            "Gender",
            options(&["male", "female", "other"]),
        ))
        .field(F::required(
            FieldName::known(names::NATIONALITY),
            "Nationality",
            FieldKind::Text,
        ))
        .field(F::optional(
            FieldName::known(names::ADDRESS_LINE1),
            "Address",
            FieldKind::Text,
        ))
        .field(F::optional(FieldName::known(names::CITY), "City", FieldKind::Text))
        .field(F::required(FieldName::known(names::COUNTRY), "Country", FieldKind::Text))
}

fn academic_step() -> StepSpec {
    use FieldSpec as F;
    StepSpec::new(2, "Academic History")
        .field(F::optional(
            FieldName::known(names::LANGUAGE_SKILL),
            "English proficiency test",
            options(&["ielts", "toefl", "pte", "duolingo", "none"]),
        ))
        .field(F::optional(
            FieldName::known(names::LANGUAGE_SCORE),
            "Test score",
            FieldKind::Text,
        ))
        .rule(StepRule::AcademicHistory)
}

fn course_step() -> StepSpec {
    use FieldSpec as F;
    StepSpec::new(3, "Course Selection")
        .field(F::required(FieldName::known(names::PROGRAM), "Program", FieldKind::Text))
        .field(F::required(
            FieldName::known(names::DEGREE_LEVEL),
            "Degree level",
            options(&["certificate", "diploma", "bachelor", "master", "doctorate"]),
        ))
        .field(F::required(
            FieldName::known(names::STUDY_MODE),
            "Study mode",
            options(&["full_time", "part_time", "online"]),
        ))
        .field(F::required(
            FieldName::known(names::INTAKE),
            "Intake",
            options(&["january", "may", "september"]),
        ))
        .field(F::optional(
            FieldName::known(names::SCHOLARSHIP),
            "I would like to be considered for a scholarship",
            FieldKind::Checkbox,
        ))
}

fn documents_step() -> StepSpec {
    use FieldSpec as F;
    StepSpec::new(4, "Documents")
        .field(F::optional(
            FieldName::known(names::TRANSCRIPTS),
            "Academic transcripts",
            FieldKind::File { multiple: false },
        ))
        .field(F::optional(
            FieldName::known(names::PERSONAL_STATEMENT_FILE),
            "Personal statement",
            FieldKind::File { multiple: false },
        ))
        .field(F::optional(
            FieldName::known(names::ADDITIONAL_FILES),
            "Additional documents",
            FieldKind::File { multiple: true },
        ))
        .rule(StepRule::Attachment {
            field: FieldName::known(names::TRANSCRIPTS),
            message: "Please attach your academic transcripts".to_string(),
        })
        .rule(StepRule::Attachment {
            field: FieldName::known(names::PERSONAL_STATEMENT_FILE),
            message: "Please attach your personal statement".to_string(),
        })
}

fn review_step() -> StepSpec {
    use FieldSpec as F;
    StepSpec::new(5, "Review & Submit")
        .field(F::optional(
            FieldName::known(names::HOW_DID_YOU_HEAR),
            "How did you hear about us?",
            FieldKind::Text,
        ))
        .field(F::optional(
            FieldName::known(names::DECLARATION),
            "I declare that the information provided is true and complete",
            FieldKind::Checkbox,
        ))
        .field(F::optional(
            FieldName::known(names::PRIVACY),
            "I accept the privacy policy",
            FieldKind::Checkbox,
        ))
        .field(F::optional(
            FieldName::known(names::MARKETING_CONSENT),
            "Send me news about programs and events",
            FieldKind::Checkbox,
        ))
        .rule(StepRule::Consent {
            field: FieldName::known(names::DECLARATION),
            message: "Please accept the declaration".to_string(),
        })
        .rule(StepRule::Consent {
            field: FieldName::known(names::PRIVACY),
            message: "Please accept the privacy policy".to_string(),
        })
}
