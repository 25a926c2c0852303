//! PostgreSQL implementation of [`BudgetStore`].
//!
//! Each call runs in its own RLS-scoped transaction. Writes that must not
//! create duplicates go through `INSERT .. ON CONFLICT` against the partial
//! unique indexes on `monthly_budgets`, so concurrent requests converge on
//! one row.

use std::str::FromStr;

use async_trait::async_trait;
use budgetly_core::budget::{
    Amounts, BudgetField, BudgetMonth, BudgetTemplate, FIELD_SCHEMA, MonthlyBudget,
    NewMonthlyBudget,
};
use budgetly_core::foreign::{ForeignExpenseItem, ForeignExpenseLedger, NewForeignLedger};
use budgetly_core::store::{BudgetStore, StoreError, StoreResult};
use budgetly_shared::types::{BudgetId, Currency, ForeignLedgerId, Money, UserId};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, EntityTrait,
    QueryFilter, QuerySelect, RuntimeErr, Set, SqlErr, Statement, Value,
};

use crate::entities::{foreign_expenses, monthly_budgets};
use crate::rls::{RlsConnection, RlsExt};

/// Budget store backed by PostgreSQL.
#[derive(Debug)]
pub struct PgBudgetStore {
    db: DatabaseConnection,
}

impl PgBudgetStore {
    /// Creates a store on a connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn begin(&self, user_id: UserId) -> StoreResult<RlsConnection> {
        self.db.with_rls(user_id).await.map_err(store_err)
    }
}

#[async_trait]
impl BudgetStore for PgBudgetStore {
    async fn find_template(&self, user_id: UserId) -> StoreResult<Option<BudgetTemplate>> {
        let rls = self.begin(user_id).await?;
        let rows = monthly_budgets::Entity::find()
            .filter(monthly_budgets::Column::UserId.eq(user_id.into_inner()))
            .filter(monthly_budgets::Column::IsTemplate.eq(true))
            .limit(2)
            .all(rls.transaction())
            .await
            .map_err(store_err)?;
        rls.commit().await.map_err(store_err)?;

        Ok(single(rows, "budget template")?.map(to_template))
    }

    async fn upsert_template(&self, user_id: UserId, planned: &Amounts) -> StoreResult<BudgetTemplate> {
        let rls = self.begin(user_id).await?;
        let values = row_values(
            BudgetId::new(),
            user_id,
            None,
            planned,
            &Amounts::ZERO,
            planned.total_income(),
        );
        let row = monthly_budgets::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                upsert_template_sql(),
                values,
            ))
            .one(rls.transaction())
            .await
            .map_err(store_err)?
            .ok_or_else(|| StoreError::Backend("template upsert returned no row".to_string()))?;
        rls.commit().await.map_err(store_err)?;

        Ok(to_template(row))
    }

    async fn find_monthly_budget(
        &self,
        user_id: UserId,
        month: BudgetMonth,
    ) -> StoreResult<Option<MonthlyBudget>> {
        let rls = self.begin(user_id).await?;
        let row = find_month(rls.transaction(), user_id, month).await?;
        rls.commit().await.map_err(store_err)?;

        row.map(to_budget).transpose()
    }

    async fn insert_monthly_budget(&self, budget: &NewMonthlyBudget) -> StoreResult<MonthlyBudget> {
        let rls = self.begin(budget.user_id).await?;
        let values = row_values(
            BudgetId::new(),
            budget.user_id,
            Some(budget.month),
            &budget.planned,
            &budget.actual,
            budget.total_income,
        );
        let inserted = monthly_budgets::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                insert_month_sql(),
                values,
            ))
            .one(rls.transaction())
            .await
            .map_err(store_err)?;

        let row = match inserted {
            Some(row) => row,
            None => {
                tracing::debug!(
                    user_id = %budget.user_id,
                    month = %budget.month,
                    "Monthly budget inserted concurrently, returning existing row"
                );
                find_month(rls.transaction(), budget.user_id, budget.month)
                    .await?
                    .ok_or_else(|| {
                        StoreError::Backend("conflicting monthly budget is not visible".to_string())
                    })?
            }
        };
        rls.commit().await.map_err(store_err)?;

        to_budget(row)
    }

    async fn update_actuals(
        &self,
        user_id: UserId,
        month: BudgetMonth,
        updates: &[(BudgetField, Decimal)],
    ) -> StoreResult<Option<MonthlyBudget>> {
        let rls = self.begin(user_id).await?;

        let mut update = monthly_budgets::Entity::update_many();
        for (field, value) in updates {
            update = update.col_expr(actual_column(*field)?, Expr::value(*value));
        }
        let result = update
            .col_expr(monthly_budgets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(month_filter(user_id, month))
            .exec(rls.transaction())
            .await
            .map_err(store_err)?;

        if result.rows_affected == 0 {
            rls.rollback().await.map_err(store_err)?;
            return Ok(None);
        }

        let row = find_month(rls.transaction(), user_id, month).await?;
        rls.commit().await.map_err(store_err)?;

        row.map(to_budget).transpose()
    }

    async fn find_foreign_ledger(
        &self,
        user_id: UserId,
        month: BudgetMonth,
    ) -> StoreResult<Option<ForeignExpenseLedger>> {
        let rls = self.begin(user_id).await?;
        let rows = foreign_expenses::Entity::find()
            .filter(foreign_expenses::Column::UserId.eq(user_id.into_inner()))
            .filter(foreign_expenses::Column::Year.eq(month.year()))
            .filter(foreign_expenses::Column::Month.eq(month_number(month)))
            .limit(2)
            .all(rls.transaction())
            .await
            .map_err(store_err)?;
        rls.commit().await.map_err(store_err)?;

        single(rows, "foreign expense ledger")?
            .map(to_ledger)
            .transpose()
    }

    async fn record_foreign_ledger(
        &self,
        ledger: &NewForeignLedger,
    ) -> StoreResult<Option<ForeignExpenseLedger>> {
        let rls = self.begin(ledger.user_id).await?;
        let now = Utc::now();

        let result = monthly_budgets::Entity::update_many()
            .col_expr(
                monthly_budgets::Column::ActualForeignExpenses,
                Expr::value(ledger.total_primary.amount),
            )
            .col_expr(monthly_budgets::Column::UpdatedAt, Expr::value(now))
            .filter(month_filter(ledger.user_id, ledger.month))
            .exec(rls.transaction())
            .await
            .map_err(store_err)?;

        if result.rows_affected == 0 {
            rls.rollback().await.map_err(store_err)?;
            return Ok(None);
        }

        let items = serde_json::to_value(&ledger.items)
            .map_err(|e| StoreError::Backend(format!("cannot encode expense items: {e}")))?;
        let row = foreign_expenses::ActiveModel {
            id: Set(ForeignLedgerId::new().into_inner()),
            user_id: Set(ledger.user_id.into_inner()),
            year: Set(ledger.month.year()),
            month: Set(month_number(ledger.month)),
            items: Set(items),
            exchange_rate: Set(ledger.exchange_rate),
            total_foreign: Set(ledger.total_foreign.amount),
            total_primary: Set(ledger.total_primary.amount),
            foreign_currency: Set(ledger.total_foreign.currency.code().to_string()),
            primary_currency: Set(ledger.total_primary.currency.code().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let saved = foreign_expenses::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    foreign_expenses::Column::UserId,
                    foreign_expenses::Column::Year,
                    foreign_expenses::Column::Month,
                ])
                .update_columns([
                    foreign_expenses::Column::Items,
                    foreign_expenses::Column::ExchangeRate,
                    foreign_expenses::Column::TotalForeign,
                    foreign_expenses::Column::TotalPrimary,
                    foreign_expenses::Column::ForeignCurrency,
                    foreign_expenses::Column::PrimaryCurrency,
                    foreign_expenses::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_with_returning(rls.transaction())
            .await
            .map_err(store_err)?;
        rls.commit().await.map_err(store_err)?;

        to_ledger(saved).map(Some)
    }
}

// ============================================================
// SQL
// ============================================================

const INSERT_PREFIX_COLUMNS: [&str; 5] = ["id", "user_id", "is_template", "year", "month"];

/// Planned then actual amount columns, in schema order.
fn amount_columns() -> impl Iterator<Item = &'static str> {
    FIELD_SCHEMA
        .iter()
        .map(|spec| spec.key)
        .chain(FIELD_SCHEMA.iter().map(|spec| spec.actual_key))
}

fn insert_sql(conflict: &str) -> String {
    let columns: Vec<&str> = INSERT_PREFIX_COLUMNS
        .into_iter()
        .chain(amount_columns())
        .chain(std::iter::once("total_income"))
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();

    format!(
        "INSERT INTO monthly_budgets ({}) VALUES ({}) {conflict} RETURNING *",
        columns.join(", "),
        placeholders.join(", "),
    )
}

/// Creates the template or replaces its planned amounts.
pub(crate) fn upsert_template_sql() -> String {
    let assignments: Vec<String> = FIELD_SCHEMA
        .iter()
        .map(|spec| spec.key)
        .chain(std::iter::once("total_income"))
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect();

    insert_sql(&format!(
        "ON CONFLICT (user_id) WHERE is_template DO UPDATE SET {}, updated_at = now()",
        assignments.join(", ")
    ))
}

/// Inserts a month unless the user already has it; returns no row then.
pub(crate) fn insert_month_sql() -> String {
    insert_sql("ON CONFLICT (user_id, year, month) WHERE NOT is_template DO NOTHING")
}

/// Bind values matching [`insert_sql`]'s column order.
pub(crate) fn row_values(
    id: BudgetId,
    user_id: UserId,
    month: Option<BudgetMonth>,
    planned: &Amounts,
    actual: &Amounts,
    total_income: Decimal,
) -> Vec<Value> {
    let mut values: Vec<Value> = vec![
        id.into_inner().into(),
        user_id.into_inner().into(),
        month.is_none().into(),
        month.map(BudgetMonth::year).into(),
        month.map(month_number).into(),
    ];
    values.extend(planned.iter().map(|(_, amount)| Value::from(amount)));
    values.extend(actual.iter().map(|(_, amount)| Value::from(amount)));
    values.push(total_income.into());
    values
}

pub(crate) fn actual_column(field: BudgetField) -> StoreResult<monthly_budgets::Column> {
    monthly_budgets::Column::from_str(field.actual_key())
        .map_err(|_| StoreError::Backend(format!("no column for {}", field.actual_key())))
}

fn month_filter(user_id: UserId, month: BudgetMonth) -> sea_orm::Condition {
    sea_orm::Condition::all()
        .add(monthly_budgets::Column::UserId.eq(user_id.into_inner()))
        .add(monthly_budgets::Column::IsTemplate.eq(false))
        .add(monthly_budgets::Column::Year.eq(month.year()))
        .add(monthly_budgets::Column::Month.eq(month_number(month)))
}

async fn find_month(
    txn: &DatabaseTransaction,
    user_id: UserId,
    month: BudgetMonth,
) -> StoreResult<Option<monthly_budgets::Model>> {
    let rows = monthly_budgets::Entity::find()
        .filter(month_filter(user_id, month))
        .limit(2)
        .all(txn)
        .await
        .map_err(store_err)?;
    single(rows, "monthly budget")
}

// ============================================================
// Mapping
// ============================================================

fn store_err(err: DbErr) -> StoreError {
    if let Some(
        SqlErr::UniqueConstraintViolation(detail) | SqlErr::ForeignKeyConstraintViolation(detail),
    ) = err.sql_err()
    {
        return StoreError::Rejected(detail);
    }
    match sqlstate(&err) {
        Some(code) if rejects_input(&code) => StoreError::Rejected(format!("{err} ({code})")),
        _ => StoreError::Backend(err.to_string()),
    }
}

fn sqlstate(err: &DbErr) -> Option<String> {
    let (DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
    | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err))) = err
    else {
        return None;
    };
    sqlx_err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code.into_owned())
}

/// Class 22 (data exception, e.g. numeric overflow) and class 23
/// (integrity violation, e.g. CHECK) are caused by the written values.
fn rejects_input(sqlstate: &str) -> bool {
    sqlstate.starts_with("22") || sqlstate.starts_with("23")
}

fn single<T>(mut rows: Vec<T>, what: &'static str) -> StoreResult<Option<T>> {
    if rows.len() > 1 {
        return Err(StoreError::Duplicate { what });
    }
    Ok(rows.pop())
}

// Months are 1..=12.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn month_number(month: BudgetMonth) -> i16 {
    month.month() as i16
}

fn month_of(year: Option<i32>, month: Option<i16>) -> StoreResult<BudgetMonth> {
    let (Some(year), Some(month)) = (year, month) else {
        return Err(StoreError::Backend("monthly budget row has no month".to_string()));
    };
    let month = u32::try_from(month)
        .map_err(|_| StoreError::Backend(format!("invalid month {month}")))?;
    BudgetMonth::new(year, month).map_err(|e| StoreError::Backend(e.to_string()))
}

fn to_template(model: monthly_budgets::Model) -> BudgetTemplate {
    BudgetTemplate {
        id: BudgetId::from_uuid(model.id),
        user_id: UserId::from_uuid(model.user_id),
        planned: model.planned(),
        total_income: model.total_income,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn to_budget(model: monthly_budgets::Model) -> StoreResult<MonthlyBudget> {
    Ok(MonthlyBudget {
        id: BudgetId::from_uuid(model.id),
        user_id: UserId::from_uuid(model.user_id),
        month: month_of(model.year, model.month)?,
        planned: model.planned(),
        actual: model.actual(),
        total_income: model.total_income,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn to_ledger(model: foreign_expenses::Model) -> StoreResult<ForeignExpenseLedger> {
    let items: Vec<ForeignExpenseItem> = serde_json::from_value(model.items)
        .map_err(|e| StoreError::Backend(format!("cannot decode expense items: {e}")))?;
    let currency = |code: &str| Currency::from_str(code).map_err(StoreError::Backend);

    Ok(ForeignExpenseLedger {
        id: ForeignLedgerId::from_uuid(model.id),
        user_id: UserId::from_uuid(model.user_id),
        month: month_of(Some(model.year), Some(model.month))?,
        items,
        exchange_rate: model.exchange_rate,
        total_foreign: Money::new(model.total_foreign, currency(&model.foreign_currency)?),
        total_primary: Money::new(model.total_primary, currency(&model.primary_currency)?),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
