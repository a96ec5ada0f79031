// Quill Forms
// Form state container with per-field validation, reset snapshots and guarded submit

pub mod busy;
pub mod field;
pub mod form;
pub mod values;

pub use busy::{BusyFlag, BusyGuard};
pub use field::{Field, FieldValidator, REQUIRED_MESSAGE};
pub use form::{Form, INVALID_FORM_MESSAGE};
pub use values::FormValues;

// Re-export validation types used to build fields
pub use quill_validation::{FieldValue, Rule, RuleSet, ValidationErrors};
