// File: src/rule.rs
// Purpose: Validation rules (required, email, min/max length, pattern, url)

use regex::Regex;
use serde::Serialize;

use crate::error::ValidationError;
use crate::predicates::{is_valid_email, is_valid_url};
use crate::value::FieldValue;

/// Result of checking one value against one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    #[serde(rename = "isValid")]
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// What a rule checks
#[derive(Debug, Clone)]
pub enum RuleKind {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Matches(Regex),
    Url,
}

/// A rule kind paired with the message reported when it fails
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    message: String,
}

impl Rule {
    /// Empty strings, whitespace-only strings, empty arrays and null fail
    pub fn required() -> Self {
        Self::new(RuleKind::Required, "This field is required")
    }

    pub fn email() -> Self {
        Self::new(RuleKind::Email, "Please enter a valid email address")
    }

    pub fn min_length(length: usize) -> Self {
        Self::new(
            RuleKind::MinLength(length),
            format!("Minimum length is {} characters", length),
        )
    }

    pub fn max_length(length: usize) -> Self {
        Self::new(
            RuleKind::MaxLength(length),
            format!("Maximum length is {} characters", length),
        )
    }

    /// Pattern rule. Patterns carry no sensible default message, so one is required.
    pub fn matches(pattern: &str, message: impl Into<String>) -> Result<Self, ValidationError> {
        let regex = Regex::new(pattern).map_err(|source| ValidationError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::new(RuleKind::Matches(regex), message))
    }

    pub fn url() -> Self {
        Self::new(RuleKind::Url, "Please enter a valid URL")
    }

    /// Replace the default failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check a value against this rule
    pub fn check(&self, value: &FieldValue) -> bool {
        match &self.kind {
            RuleKind::Required => !value.is_blank(),
            RuleKind::Email => is_valid_email(&value.as_text()),
            RuleKind::MinLength(min) => value.length() >= *min,
            RuleKind::MaxLength(max) => value.length() <= *max,
            RuleKind::Matches(regex) => regex.is_match(&value.as_text()),
            RuleKind::Url => is_valid_url(&value.as_text()),
        }
    }

    pub fn validate(&self, value: &FieldValue) -> ValidationOutcome {
        if self.check(value) {
            ValidationOutcome::pass()
        } else {
            ValidationOutcome::fail(self.message.clone())
        }
    }

    fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
