// File: src/field.rs
// Purpose: A single form field: value plus validation state

use std::fmt;
use std::sync::Arc;

use quill_validation::{FieldValue, Rule};

/// Custom field check: `None` when valid, `Some(message)` otherwise
pub type FieldValidator = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// One named value and its validation state
#[derive(Clone, Default)]
pub struct Field {
    pub(crate) value: FieldValue,
    pub(crate) error: Option<String>,
    pub(crate) touched: bool,
    pub(crate) required: bool,
    pub(crate) validator: Option<FieldValidator>,
}

impl Field {
    /// Create an untouched, error-free field
    pub fn new(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a custom validator
    pub fn validate_with<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Attach rules as the custom validator; the first failing rule's message wins
    pub fn rules(self, rules: Vec<Rule>) -> Self {
        self.validate_with(move |value| {
            rules
                .iter()
                .find(|rule| !rule.check(value))
                .map(|rule| rule.message().to_string())
        })
    }

    /// Start with an error already recorded (e.g. from a server response)
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Compute the error for the current value without storing it
    ///
    /// `required` is checked first; the custom validator only runs when the
    /// required check passes.
    pub fn check(&self) -> Option<String> {
        if self.required && self.value.is_blank() {
            Some(REQUIRED_MESSAGE.to_string())
        } else {
            self.validator.as_ref().and_then(|validate| validate(&self.value))
        }
    }

    pub(crate) fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            value: self.value.clone(),
            error: self.error.clone(),
            touched: self.touched,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: &FieldSnapshot) {
        self.value = snapshot.value.clone();
        self.error = snapshot.error.clone();
        self.touched = snapshot.touched;
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("value", &self.value)
            .field("error", &self.error)
            .field("touched", &self.touched)
            .field("required", &self.required)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Initial (value, error, touched) triple kept for resets
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldSnapshot {
    value: FieldValue,
    error: Option<String>,
    touched: bool,
}
