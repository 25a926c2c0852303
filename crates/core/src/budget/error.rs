//! Budget error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Month outside 1..=12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// Year outside the supported range.
    #[error("Year must be between 2000 and 2100, got {0}")]
    InvalidYear(i32),

    /// Month string not in `YYYY-MM` form.
    #[error("Malformed month '{0}', expected YYYY-MM")]
    MalformedMonth(String),

    /// Form input failed schema validation.
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
}

/// A problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form key the problem relates to.
    pub key: String,
    /// Human readable description.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.message)
    }
}

/// All problems found in one form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}
