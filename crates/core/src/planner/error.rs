//! Planner error types.

use budgetly_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::budget::{BudgetError, BudgetMonth, ValidationErrors};
use crate::foreign::ConversionError;
use crate::store::StoreError;
use crate::template::EditorError;

/// Errors surfaced by [`super::BudgetPlanner`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// No user identity was supplied.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A budget was requested before any template was saved.
    #[error("Create a budget template first")]
    NoTemplateConfigured,

    /// Exchange rate was zero or negative.
    #[error("Exchange rate must be greater than zero, got {0}")]
    InvalidRate(Decimal),

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// The month has no budget yet.
    #[error("No budget exists for {0}")]
    NoBudgetForMonth(BudgetMonth),

    /// A unique lookup returned more than one row.
    #[error("Found more than one {0}")]
    DuplicateRow(&'static str),

    /// Storage failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for PlannerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { what } => {
                tracing::error!(what, "Duplicate rows for a unique key");
                Self::DuplicateRow(what)
            }
            StoreError::Rejected(detail) => {
                tracing::warn!(detail, "Store rejected the write");
                Self::Validation("Amounts were rejected by storage".to_string())
            }
            other => {
                tracing::error!(error = %other, "Budget store failed");
                Self::Store(other)
            }
        }
    }
}

impl From<ValidationErrors> for PlannerError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<BudgetError> for PlannerError {
    fn from(err: BudgetError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<EditorError> for PlannerError {
    fn from(err: EditorError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ConversionError> for PlannerError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::InvalidRate(rate) => Self::InvalidRate(rate),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::NotAuthenticated => Self::Unauthorized(err.to_string()),
            PlannerError::NoTemplateConfigured => Self::NoTemplateConfigured(err.to_string()),
            PlannerError::NoBudgetForMonth(_) => Self::NotFound(err.to_string()),
            PlannerError::InvalidRate(_) | PlannerError::Validation(_) => {
                Self::Validation(err.to_string())
            }
            PlannerError::DuplicateRow(_) => Self::Conflict(err.to_string()),
            // Backend details stay in the logs.
            PlannerError::Store(_) => Self::Database("Storage is temporarily unavailable".to_string()),
        }
    }
}
