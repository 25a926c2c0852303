//! Budget planner: the workflows behind every budget endpoint.

use std::sync::Arc;

use budgetly_shared::types::{Currency, Money, UserId};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::PlannerError;
use crate::budget::{
    Amounts, BudgetMonth, BudgetService, BudgetSummary, BudgetTemplate, FormValues, MonthlyBudget,
    validate_form,
};
use crate::foreign::{ForeignConversion, ForeignExpenseItem, ForeignExpenseLedger, NewForeignLedger};
use crate::store::BudgetStore;
use crate::template::{PendingOverwrite, SubmitOutcome, TemplateEditor};

/// Result type for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Currencies budgets are kept in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyPair {
    /// Currency of every budget amount.
    pub primary: Currency,
    /// Currency of the foreign expense ledger.
    pub foreign: Currency,
}

/// Outcome of a template submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSubmission {
    /// The template was written.
    Saved(BudgetTemplate),
    /// A template exists and the overwrite was not confirmed; nothing was
    /// written.
    AwaitingConfirmation {
        /// Stored template.
        current: BudgetTemplate,
        /// Values that would replace it.
        pending: Amounts,
    },
}

/// Runs budget workflows against a [`BudgetStore`].
///
/// Every operation takes the caller's identity and fails with
/// [`PlannerError::NotAuthenticated`] before touching storage when there
/// is none.
#[derive(Clone)]
pub struct BudgetPlanner {
    store: Arc<dyn BudgetStore>,
    currencies: CurrencyPair,
}

impl BudgetPlanner {
    /// Creates a planner.
    pub fn new(store: Arc<dyn BudgetStore>, currencies: CurrencyPair) -> Self {
        Self { store, currencies }
    }

    /// Configured currencies.
    #[must_use]
    pub const fn currencies(&self) -> CurrencyPair {
        self.currencies
    }

    /// The user's template, if one was saved.
    pub async fn get_template(&self, identity: Option<UserId>) -> PlannerResult<Option<BudgetTemplate>> {
        let user_id = authenticated(identity)?;
        Ok(self.store.find_template(user_id).await?)
    }

    /// Validates and saves template values.
    ///
    /// With no stored template the values are written at once. Otherwise
    /// they are only written when `confirm_overwrite` is set; without it
    /// the stored and submitted values are returned for the user to
    /// compare.
    pub async fn submit_template(
        &self,
        identity: Option<UserId>,
        form: &FormValues,
        confirm_overwrite: bool,
    ) -> PlannerResult<TemplateSubmission> {
        let user_id = authenticated(identity)?;
        let current = self.store.find_template(user_id).await?;

        let mut editor = TemplateEditor::new();
        let values = match editor.submit(form, current)? {
            SubmitOutcome::Commit(values) => values,
            SubmitOutcome::AwaitConfirmation if confirm_overwrite => editor.confirm()?,
            SubmitOutcome::AwaitConfirmation => {
                let PendingOverwrite { pending, current } = editor.cancel()?;
                tracing::debug!(%user_id, "Template overwrite awaiting confirmation");
                return Ok(TemplateSubmission::AwaitingConfirmation { current, pending });
            }
        };

        let saved = self.store.upsert_template(user_id, &values).await;
        editor.finish()?;
        let template = saved?;

        tracing::info!(%user_id, template_id = %template.id, "Budget template saved");
        Ok(TemplateSubmission::Saved(template))
    }

    /// Returns the month containing `date`, creating it from the template
    /// if needed.
    pub async fn ensure_budget_for_month(
        &self,
        identity: Option<UserId>,
        date: NaiveDate,
    ) -> PlannerResult<MonthlyBudget> {
        let user_id = authenticated(identity)?;
        let month = BudgetMonth::from_date(date)?;
        self.materialize(user_id, month).await
    }

    /// Returns the budget for the current month in `timezone`, creating it
    /// from the template if needed.
    pub async fn materialize_current_month(
        &self,
        identity: Option<UserId>,
        timezone: Tz,
    ) -> PlannerResult<MonthlyBudget> {
        let today = Utc::now().with_timezone(&timezone).date_naive();
        self.ensure_budget_for_month(identity, today).await
    }

    /// Returns the budget for `month`, creating it from the template if
    /// needed.
    ///
    /// Repeated and concurrent calls all return the same row.
    pub async fn ensure_budget(
        &self,
        identity: Option<UserId>,
        month: BudgetMonth,
    ) -> PlannerResult<MonthlyBudget> {
        let user_id = authenticated(identity)?;
        self.materialize(user_id, month).await
    }

    async fn materialize(&self, user_id: UserId, month: BudgetMonth) -> PlannerResult<MonthlyBudget> {
        if let Some(existing) = self.store.find_monthly_budget(user_id, month).await? {
            tracing::debug!(%user_id, %month, "Monthly budget already exists");
            return Ok(existing);
        }

        let Some(template) = self.store.find_template(user_id).await? else {
            tracing::debug!(%user_id, %month, "No template to materialize from");
            return Err(PlannerError::NoTemplateConfigured);
        };

        let new_budget = BudgetService::materialize(&template, month);
        let budget = self.store.insert_monthly_budget(&new_budget).await?;

        tracing::info!(%user_id, %month, budget_id = %budget.id, "Monthly budget materialized");
        Ok(budget)
    }

    /// The budget for `month`, without creating it.
    pub async fn get_monthly_budget(
        &self,
        identity: Option<UserId>,
        month: BudgetMonth,
    ) -> PlannerResult<Option<MonthlyBudget>> {
        let user_id = authenticated(identity)?;
        Ok(self.store.find_monthly_budget(user_id, month).await?)
    }

    /// Planned versus actual figures for `month`.
    pub async fn summarize(
        &self,
        identity: Option<UserId>,
        month: BudgetMonth,
    ) -> PlannerResult<BudgetSummary> {
        let user_id = authenticated(identity)?;
        let budget = self
            .store
            .find_monthly_budget(user_id, month)
            .await?
            .ok_or(PlannerError::NoBudgetForMonth(month))?;
        Ok(BudgetSummary::from_budget(&budget))
    }

    /// Sets actual amounts on the budget for `month`.
    ///
    /// Only the categories present in `form` change; planned amounts are
    /// never touched.
    pub async fn record_actuals(
        &self,
        identity: Option<UserId>,
        month: BudgetMonth,
        form: &FormValues,
    ) -> PlannerResult<MonthlyBudget> {
        let user_id = authenticated(identity)?;
        let updates = validate_form(form)?;

        let budget = self
            .store
            .update_actuals(user_id, month, &updates)
            .await?
            .ok_or(PlannerError::NoBudgetForMonth(month))?;

        tracing::info!(%user_id, %month, fields = updates.len(), "Actual amounts recorded");
        Ok(budget)
    }

    /// Records the month's foreign expenses and their converted total.
    ///
    /// `rate` is foreign units per primary unit. Nothing is written when
    /// the input is invalid or the month has no budget.
    pub async fn record_foreign_expenses(
        &self,
        identity: Option<UserId>,
        month: BudgetMonth,
        items: Vec<ForeignExpenseItem>,
        rate: Decimal,
    ) -> PlannerResult<ForeignExpenseLedger> {
        let user_id = authenticated(identity)?;
        let conversion = ForeignConversion::compute(&items, rate)?;

        let ledger = NewForeignLedger {
            user_id,
            month,
            items,
            exchange_rate: rate,
            total_foreign: Money::new(conversion.total_foreign, self.currencies.foreign),
            total_primary: Money::new(conversion.total_primary, self.currencies.primary),
        };

        let recorded = self
            .store
            .record_foreign_ledger(&ledger)
            .await?
            .ok_or(PlannerError::NoBudgetForMonth(month))?;

        tracing::info!(
            %user_id,
            %month,
            total_foreign = %conversion.total_foreign,
            total_primary = %conversion.total_primary,
            "Foreign expenses recorded"
        );
        Ok(recorded)
    }

    /// The stored foreign expenses for `month`, if any.
    pub async fn get_foreign_expenses(
        &self,
        identity: Option<UserId>,
        month: BudgetMonth,
    ) -> PlannerResult<Option<ForeignExpenseLedger>> {
        let user_id = authenticated(identity)?;
        Ok(self.store.find_foreign_ledger(user_id, month).await?)
    }
}

fn authenticated(identity: Option<UserId>) -> PlannerResult<UserId> {
    identity.ok_or(PlannerError::NotAuthenticated)
}
