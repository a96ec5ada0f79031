// File: src/form.rs
// Purpose: Form state container: fields, derived flags, validation, reset and submit

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::future::Future;

use quill_validation::FieldValue;

use crate::busy::BusyFlag;
use crate::field::{Field, FieldSnapshot};
use crate::values::FormValues;

/// Submit error recorded when validation blocks a submission
pub const INVALID_FORM_MESSAGE: &str = "Please fix the errors before submitting";

/// Form state container
///
/// Owns every [`Field`] and the snapshot each field started from. Fields are
/// only mutated through this API, which keeps the derived flags honest:
///
/// - `is_valid()` holds iff no field has an error
/// - `is_dirty()` holds iff some field was touched
///
/// # Example
///
/// ```
/// use quill_forms::{Field, Form};
///
/// let mut form = Form::new()
///     .field("title", Field::new("").required())
///     .field("content", Field::new("").required());
///
/// form.set_value("title", "Hello");
/// assert!(form.is_dirty());
/// assert!(!form.validate_all()); // content is still empty
/// ```
#[derive(Debug, Default)]
pub struct Form {
    fields: BTreeMap<String, Field>,
    initial: BTreeMap<String, FieldSnapshot>,
    busy: BusyFlag,
    submit_error: Option<String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field; its current state becomes the reset target
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        self.initial.insert(name.clone(), field.snapshot());
        self.fields.insert(name, field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).map(Field::value)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Field::error)
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.fields.get(name).map(Field::is_touched).unwrap_or(false)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// True when any field has been touched
    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(|field| field.touched)
    }

    /// True when no field carries an error
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|field| field.error.is_none())
    }

    /// True while `submit` is running
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Shared handle on the busy flag, for observers outside the form
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Current error per field, for rendering
    pub fn errors(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .filter_map(|(name, field)| field.error.clone().map(|e| (name.clone(), e)))
            .collect()
    }

    /// Set a value, mark the field touched and re-validate it
    ///
    /// Unknown field names are ignored.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) {
        let Some(field) = self.fields.get_mut(name) else {
            tracing::debug!("set_value on unknown field {}", name);
            return;
        };

        field.value = value.into();
        field.touched = true;
        self.validate_field(name);
    }

    /// Recompute and store the error for one field, marking it touched
    pub fn validate_field(&mut self, name: &str) {
        if let Some(field) = self.fields.get_mut(name) {
            field.error = field.check();
            field.touched = true;
        }
    }

    /// Validate every field; returns `is_valid()` afterwards
    pub fn validate_all(&mut self) -> bool {
        for field in self.fields.values_mut() {
            field.error = field.check();
            field.touched = true;
        }
        self.is_valid()
    }

    /// Restore one field to its initial (value, error, touched) triple
    pub fn reset_field(&mut self, name: &str) {
        if let (Some(field), Some(snapshot)) = (self.fields.get_mut(name), self.initial.get(name)) {
            field.restore(snapshot);
        }
    }

    /// Restore every field, clear the submit error and the busy flag
    pub fn reset_all(&mut self) {
        for (name, field) in self.fields.iter_mut() {
            if let Some(snapshot) = self.initial.get(name) {
                field.restore(snapshot);
            }
        }
        self.submit_error = None;
        self.busy.clear();
    }

    /// Plain value map of every field
    pub fn values(&self) -> FormValues {
        FormValues::new(
            self.fields
                .iter()
                .map(|(name, field)| (name.clone(), field.value.clone()))
                .collect(),
        )
    }

    /// Validate, then hand the values to `callback`
    ///
    /// - invalid form: records [`INVALID_FORM_MESSAGE`], callback not invoked
    /// - callback error: its message becomes the submit error
    ///
    /// The busy flag is set for the duration and cleared on every exit path.
    /// Returns true only when the callback ran and succeeded.
    pub async fn submit<F, Fut, E>(&mut self, callback: F) -> bool
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let _busy = self.busy.acquire();
        self.submit_error = None;

        if !self.validate_all() {
            tracing::debug!("submit blocked by {} invalid field(s)", self.errors().len());
            self.submit_error = Some(INVALID_FORM_MESSAGE.to_string());
            return false;
        }

        match callback(self.values()).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("submit callback failed: {}", err);
                self.submit_error = Some(err.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::REQUIRED_MESSAGE;
    use pretty_assertions::assert_eq;
    use quill_validation::Rule;

    fn post_form() -> Form {
        Form::new()
            .field("title", Field::new("").required())
            .field("content", Field::new("").required())
            .field(
                "slug",
                Field::new("").validate_with(|v| {
                    v.as_str()
                        .filter(|s| s.contains(' '))
                        .map(|_| "No spaces allowed".to_string())
                }),
            )
    }

    #[test]
    fn test_new_form_is_clean() {
        let form = post_form();
        assert!(!form.is_dirty());
        assert!(form.is_valid());
        assert!(!form.is_busy());
        assert_eq!(form.submit_error(), None);
    }

    #[test]
    fn test_set_value_marks_touched_and_validates() {
        let mut form = post_form();

        form.set_value("title", "   ");
        assert!(form.is_touched("title"));
        assert!(form.is_dirty());
        assert_eq!(form.error("title"), Some(REQUIRED_MESSAGE));
        assert!(!form.is_valid());

        form.set_value("title", "Hello");
        assert_eq!(form.error("title"), None);
        assert!(form.is_valid());
    }

    #[test]
    fn test_set_value_unknown_field_is_noop() {
        let mut form = post_form();
        form.set_value("nope", "x");
        assert!(!form.is_dirty());
        assert!(form.value("nope").is_none());
    }

    #[test]
    fn test_custom_validator() {
        let mut form = post_form();
        form.set_value("slug", "has space");
        assert_eq!(form.error("slug"), Some("No spaces allowed"));
        form.set_value("slug", "no-space");
        assert_eq!(form.error("slug"), None);
    }

    #[test]
    fn test_validate_all() {
        let mut form = post_form();
        assert!(!form.validate_all());
        assert_eq!(form.error("title"), Some(REQUIRED_MESSAGE));
        assert_eq!(form.error("content"), Some(REQUIRED_MESSAGE));
        assert_eq!(form.error("slug"), None);
        assert!(form.is_dirty());

        form.set_value("title", "A");
        form.set_value("content", "B");
        assert!(form.validate_all());
    }

    #[test]
    fn test_reset_field_restores_initial_triple() {
        let mut form = Form::new().field("email", Field::new("seed@example.com").rules(vec![Rule::email()]));

        form.set_value("email", "broken");
        form.set_value("email", "still broken");
        assert!(form.error("email").is_some());

        form.reset_field("email");
        assert_eq!(form.value("email"), Some(&FieldValue::from("seed@example.com")));
        assert_eq!(form.error("email"), None);
        assert!(!form.is_touched("email"));
    }

    #[test]
    fn test_reset_field_keeps_initial_error() {
        let mut form = Form::new().field("name", Field::new("x").with_error("Taken"));
        form.set_value("name", "y");
        assert_eq!(form.error("name"), None);

        form.reset_field("name");
        assert_eq!(form.error("name"), Some("Taken"));
    }

    #[tokio::test]
    async fn test_reset_all() {
        let mut form = post_form();
        form.set_value("title", "Hello");
        form.set_value("content", "");

        assert!(!form.submit(|_| async { Ok::<(), String>(()) }).await);
        assert_eq!(form.submit_error(), Some(INVALID_FORM_MESSAGE));
        let busy = form.busy_flag();
        let _held = busy.acquire();
        assert!(form.is_busy());

        form.reset_all();
        assert!(!form.is_dirty());
        assert!(form.is_valid());
        assert_eq!(form.value("title"), Some(&FieldValue::from("")));
        assert_eq!(form.submit_error(), None);
        assert!(!form.is_busy());
    }

    #[test]
    fn test_is_valid_matches_errors_for_reachable_states() {
        let inputs = ["", " ", "x", "has space", "ok"];
        let mut form = post_form();

        for title in inputs {
            for slug in inputs {
                form.set_value("title", title);
                form.set_value("slug", slug);
                let none_failing = form.field_names().all(|n| form.error(n).is_none());
                assert_eq!(form.is_valid(), none_failing);
            }
            form.reset_field("slug");
            let none_failing = form.field_names().all(|n| form.error(n).is_none());
            assert_eq!(form.is_valid(), none_failing);
        }
    }

    #[tokio::test]
    async fn test_submit_invalid_skips_callback() {
        let mut form = post_form();
        let mut called = false;

        let ok = form
            .submit(|_| {
                called = true;
                async { Ok::<(), String>(()) }
            })
            .await;

        assert!(!ok);
        assert!(!called);
        assert_eq!(form.submit_error(), Some(INVALID_FORM_MESSAGE));
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn test_submit_passes_values() {
        let mut form = post_form();
        form.set_value("title", "A");
        form.set_value("content", "B");

        let busy = form.busy_flag();
        let mut seen = None;
        let ok = form
            .submit(|values| {
                assert!(busy.is_busy());
                seen = Some(values);
                async { Ok::<(), String>(()) }
            })
            .await;

        assert!(ok);
        let values = seen.expect("callback ran");
        assert_eq!(values.text("title"), Some("A"));
        assert_eq!(values.text("content"), Some("B"));
        assert_eq!(form.submit_error(), None);
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn test_submit_captures_callback_error() {
        let mut form = post_form();
        form.set_value("title", "A");
        form.set_value("content", "B");

        let ok = form
            .submit(|_| async { Err::<(), _>("backend unavailable") })
            .await;

        assert!(!ok);
        assert_eq!(form.submit_error(), Some("backend unavailable"));
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn test_submit_clears_previous_error() {
        let mut form = post_form();
        let _ = form.submit(|_| async { Ok::<(), String>(()) }).await;
        assert!(form.submit_error().is_some());

        form.set_value("title", "A");
        form.set_value("content", "B");
        assert!(form.submit(|_| async { Ok::<(), String>(()) }).await);
        assert_eq!(form.submit_error(), None);
    }
}
