//! Foreign expense ledger types.

use budgetly_shared::types::{ForeignLedgerId, Money, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::BudgetMonth;

/// One expense line in the foreign currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignExpenseItem {
    /// What the money was for, e.g. "Family support".
    pub label: String,
    /// Amount in the foreign currency.
    pub amount: Decimal,
}

impl ForeignExpenseItem {
    /// Creates an item.
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// The stored foreign expenses of one (user, month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignExpenseLedger {
    /// Row ID.
    pub id: ForeignLedgerId,
    /// Owning user.
    pub user_id: UserId,
    /// Month covered.
    pub month: BudgetMonth,
    /// Expense lines.
    pub items: Vec<ForeignExpenseItem>,
    /// Foreign units per primary unit.
    pub exchange_rate: Decimal,
    /// Sum of the items.
    pub total_foreign: Money,
    /// `total_foreign` converted.
    pub total_primary: Money,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for upserting a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForeignLedger {
    /// Owning user.
    pub user_id: UserId,
    /// Month covered.
    pub month: BudgetMonth,
    /// Expense lines.
    pub items: Vec<ForeignExpenseItem>,
    /// Foreign units per primary unit.
    pub exchange_rate: Decimal,
    /// Sum of the items.
    pub total_foreign: Money,
    /// `total_foreign` converted.
    pub total_primary: Money,
}
