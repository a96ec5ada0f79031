// File: src/rule_set.rs
// Purpose: Apply several rules per field to a map of values

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::rule::Rule;
use crate::value::FieldValue;

/// Per-field failure messages, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All errors for a field; empty when the field passed
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get first error for a specific field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.field_errors(field).first().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Rules keyed by field name
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for a field (builder style)
    pub fn field(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.rules.entry(name.into()).or_default().extend(rules);
        self
    }

    pub fn rules_for(&self, name: &str) -> &[Rule] {
        self.rules.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Validate `values` against every configured field
    ///
    /// A field missing from `values` is checked as null. Every failing rule
    /// contributes its message, so a field may report several errors.
    pub fn validate(&self, values: &HashMap<String, FieldValue>) -> Result<(), ValidationErrors> {
        let null = FieldValue::Null;
        let errors = self.rules.iter().fold(ValidationErrors::new(), |mut acc, (field, rules)| {
            let value = values.get(field).unwrap_or(&null);
            rules
                .iter()
                .filter(|rule| !rule.check(value))
                .for_each(|rule| acc.add(field.clone(), rule.message()));
            acc
        });

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn login_rules() -> RuleSet {
        RuleSet::new()
            .field("email", vec![Rule::required(), Rule::email()])
            .field("password", vec![Rule::required(), Rule::min_length(8)])
    }

    #[test]
    fn test_all_fields_pass() {
        let mut values = HashMap::new();
        values.insert("email".to_string(), FieldValue::from("admin@example.com"));
        values.insert("password".to_string(), FieldValue::from("correct horse"));

        assert!(login_rules().validate(&values).is_ok());
    }

    #[test]
    fn test_collects_every_failing_rule() {
        let mut values = HashMap::new();
        values.insert("email".to_string(), FieldValue::from(""));
        values.insert("password".to_string(), FieldValue::from("short"));

        let errors = login_rules().validate(&values).unwrap_err();
        assert_eq!(
            errors.field_errors("email"),
            &[
                "This field is required".to_string(),
                "Please enter a valid email address".to_string()
            ]
        );
        assert_eq!(errors.field_errors("password"), &["Minimum length is 8 characters".to_string()]);
    }

    #[test]
    fn test_missing_value_is_null() {
        let errors = login_rules().validate(&HashMap::new()).unwrap_err();
        assert_eq!(errors.first("password"), Some("This field is required"));
    }

    #[test]
    fn test_clear_errors() {
        let mut errors = login_rules().validate(&HashMap::new()).unwrap_err();
        assert!(errors.has_errors());
        errors.clear();
        assert!(!errors.has_errors());
        assert!(errors.field_errors("email").is_empty());
    }

    #[test]
    fn test_errors_serialize_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Please enter a valid email address");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "email": ["Please enter a valid email address"] }));
    }
}
