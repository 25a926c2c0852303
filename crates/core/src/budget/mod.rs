//! Budget categories, monthly budgets and their summaries.

pub mod error;
pub mod schema;
pub mod service;
pub mod summary;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{BudgetError, FieldError, ValidationErrors};
pub use schema::{
    AMOUNT_SCALE, BudgetField, Constraint, FIELD_SCHEMA, FieldSpec, FormValues, MAX_AMOUNT,
    Section, amounts_from_form, check_storable, form_from_amounts, validate_form,
};
pub use service::BudgetService;
pub use summary::{BudgetSummary, LineSummary, SectionTotals, VarianceStatus, progress_percent};
pub use types::{Amounts, BudgetMonth, BudgetTemplate, MonthlyBudget, NewMonthlyBudget};
