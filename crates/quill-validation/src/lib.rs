//! Quill Validation
//!
//! Pure validation rules for Quill forms: required, email, min/max length,
//! pattern and URL. Rules never touch the network and have no side effects.
//!
//! ```
//! use quill_validation::{FieldValue, Rule, RuleSet};
//! use std::collections::HashMap;
//!
//! let rules = RuleSet::new().field("email", vec![Rule::required(), Rule::email()]);
//!
//! let mut values = HashMap::new();
//! values.insert("email".to_string(), FieldValue::from("admin@example.com"));
//! assert!(rules.validate(&values).is_ok());
//! ```

pub mod error;
pub mod predicates;
pub mod rule;
pub mod rule_set;
pub mod value;

pub use error::ValidationError;
pub use predicates::{has_max_length, has_min_length, is_valid_email, is_valid_url};
pub use rule::{Rule, RuleKind, ValidationOutcome};
pub use rule_set::{RuleSet, ValidationErrors};
pub use value::FieldValue;
