// File: src/error.rs
// Purpose: Errors raised while building validation rules

use thiserror::Error;

/// Rule construction errors
///
/// Validation failures themselves are not errors; they are reported as
/// messages through [`crate::ValidationOutcome`] and [`crate::ValidationErrors`].
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
