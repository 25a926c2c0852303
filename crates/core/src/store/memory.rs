//! In-process [`BudgetStore`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use budgetly_shared::types::{BudgetId, ForeignLedgerId, UserId};
use chrono::Utc;
use rust_decimal::Decimal;

use super::{BudgetStore, StoreError, StoreResult};
use crate::budget::{Amounts, BudgetField, BudgetMonth, BudgetTemplate, MonthlyBudget, NewMonthlyBudget};
use crate::foreign::{ForeignExpenseLedger, NewForeignLedger};

#[derive(Debug, Default)]
struct Inner {
    templates: HashMap<UserId, BudgetTemplate>,
    budgets: HashMap<(UserId, BudgetMonth), MonthlyBudget>,
    ledgers: HashMap<(UserId, BudgetMonth), ForeignExpenseLedger>,
    writes: usize,
}

/// Keeps every row in memory behind one mutex.
///
/// Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryBudgetStore {
    inner: Mutex<Inner>,
}

impl InMemoryBudgetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.writes)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl BudgetStore for InMemoryBudgetStore {
    async fn find_template(&self, user_id: UserId) -> StoreResult<Option<BudgetTemplate>> {
        Ok(self.lock()?.templates.get(&user_id).cloned())
    }

    async fn upsert_template(&self, user_id: UserId, planned: &Amounts) -> StoreResult<BudgetTemplate> {
        let mut inner = self.lock()?;
        let now = Utc::now();
        let template = match inner.templates.get(&user_id) {
            Some(existing) => BudgetTemplate {
                planned: *planned,
                total_income: planned.total_income(),
                updated_at: now,
                ..existing.clone()
            },
            None => BudgetTemplate {
                id: BudgetId::new(),
                user_id,
                planned: *planned,
                total_income: planned.total_income(),
                created_at: now,
                updated_at: now,
            },
        };
        inner.templates.insert(user_id, template.clone());
        inner.writes += 1;
        Ok(template)
    }

    async fn find_monthly_budget(
        &self,
        user_id: UserId,
        month: BudgetMonth,
    ) -> StoreResult<Option<MonthlyBudget>> {
        Ok(self.lock()?.budgets.get(&(user_id, month)).cloned())
    }

    async fn insert_monthly_budget(&self, budget: &NewMonthlyBudget) -> StoreResult<MonthlyBudget> {
        let mut inner = self.lock()?;
        let key = (budget.user_id, budget.month);
        if let Some(existing) = inner.budgets.get(&key) {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let row = MonthlyBudget {
            id: BudgetId::new(),
            user_id: budget.user_id,
            month: budget.month,
            planned: budget.planned,
            actual: budget.actual,
            total_income: budget.total_income,
            created_at: now,
            updated_at: now,
        };
        inner.budgets.insert(key, row.clone());
        inner.writes += 1;
        Ok(row)
    }

    async fn update_actuals(
        &self,
        user_id: UserId,
        month: BudgetMonth,
        updates: &[(BudgetField, Decimal)],
    ) -> StoreResult<Option<MonthlyBudget>> {
        let mut inner = self.lock()?;
        let Some(budget) = inner.budgets.get_mut(&(user_id, month)) else {
            return Ok(None);
        };

        for (field, value) in updates {
            budget.actual.set(*field, *value);
        }
        budget.updated_at = Utc::now();
        let updated = budget.clone();
        inner.writes += 1;
        Ok(Some(updated))
    }

    async fn find_foreign_ledger(
        &self,
        user_id: UserId,
        month: BudgetMonth,
    ) -> StoreResult<Option<ForeignExpenseLedger>> {
        Ok(self.lock()?.ledgers.get(&(user_id, month)).cloned())
    }

    async fn record_foreign_ledger(
        &self,
        ledger: &NewForeignLedger,
    ) -> StoreResult<Option<ForeignExpenseLedger>> {
        let mut inner = self.lock()?;
        let key = (ledger.user_id, ledger.month);
        let now = Utc::now();

        let Some(budget) = inner.budgets.get_mut(&key) else {
            return Ok(None);
        };
        budget
            .actual
            .set(BudgetField::ForeignExpenses, ledger.total_primary.amount);
        budget.updated_at = now;

        let (id, created_at) = inner
            .ledgers
            .get(&key)
            .map_or_else(|| (ForeignLedgerId::new(), now), |existing| (existing.id, existing.created_at));
        let row = ForeignExpenseLedger {
            id,
            user_id: ledger.user_id,
            month: ledger.month,
            items: ledger.items.clone(),
            exchange_rate: ledger.exchange_rate,
            total_foreign: ledger.total_foreign,
            total_primary: ledger.total_primary,
            created_at,
            updated_at: now,
        };
        inner.ledgers.insert(key, row.clone());
        inner.writes += 1;
        Ok(Some(row))
    }
}
