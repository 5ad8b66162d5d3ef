mod academic;
mod draft;
mod field;
mod ids;
mod review;
mod schema;
mod wizard;

pub use academic::{
    AcademicEntry, AcademicField, AcademicHistory, AcademicHistoryError, EDUCATION_LEVELS,
};
pub use draft::{DRAFT_TTL_HOURS, DraftSnapshot, DraftSnapshotError, draft_ttl};
pub use field::{FieldName, FieldNameError, FieldValue};
pub use ids::{ApplicationId, Ordinal, ParseIdError};
pub use review::{ReviewLine, ReviewSection, ReviewSummary};
pub use schema::{FieldKind, FieldSpec, FormSchema, SchemaError, StepRule, StepSpec, names};
pub use wizard::{WizardState, WizardStateError};
