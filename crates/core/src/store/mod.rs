//! Persistence seam for budgets.
//!
//! The planner only talks to storage through [`BudgetStore`]. The database
//! crate provides the PostgreSQL implementation; [`memory`] keeps rows in
//! process for tests and local runs.

pub mod memory;

use async_trait::async_trait;
use budgetly_shared::types::UserId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::budget::{Amounts, BudgetField, BudgetMonth, BudgetTemplate, MonthlyBudget, NewMonthlyBudget};
use crate::foreign::{ForeignExpenseLedger, NewForeignLedger};

pub use memory::InMemoryBudgetStore;

/// Storage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached or failed.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A constraint refused the write.
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// A lookup by unique key found more than one row.
    #[error("Found more than one {what}")]
    Duplicate {
        /// Kind of row.
        what: &'static str,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Budget persistence.
///
/// Every method is scoped to one user. Implementations must keep at most
/// one template per user and one monthly budget per (user, month).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// The user's template, if any.
    async fn find_template(&self, user_id: UserId) -> StoreResult<Option<BudgetTemplate>>;

    /// Creates or replaces the user's template.
    async fn upsert_template(&self, user_id: UserId, planned: &Amounts) -> StoreResult<BudgetTemplate>;

    /// The user's budget for a month, if any.
    async fn find_monthly_budget(
        &self,
        user_id: UserId,
        month: BudgetMonth,
    ) -> StoreResult<Option<MonthlyBudget>>;

    /// Inserts a monthly budget unless one exists for the same month.
    ///
    /// Returns the stored row: the new one, or the one that was already
    /// there.
    async fn insert_monthly_budget(&self, budget: &NewMonthlyBudget) -> StoreResult<MonthlyBudget>;

    /// Overwrites actual amounts of an existing budget.
    ///
    /// Returns `None` when the month has no budget.
    async fn update_actuals(
        &self,
        user_id: UserId,
        month: BudgetMonth,
        updates: &[(BudgetField, Decimal)],
    ) -> StoreResult<Option<MonthlyBudget>>;

    /// The user's foreign expenses for a month, if any.
    async fn find_foreign_ledger(
        &self,
        user_id: UserId,
        month: BudgetMonth,
    ) -> StoreResult<Option<ForeignExpenseLedger>>;

    /// Upserts the foreign ledger and writes its primary total into the
    /// month's actual foreign expenses, atomically.
    ///
    /// Returns `None`, having written nothing, when the month has no
    /// budget.
    async fn record_foreign_ledger(
        &self,
        ledger: &NewForeignLedger,
    ) -> StoreResult<Option<ForeignExpenseLedger>>;
}
