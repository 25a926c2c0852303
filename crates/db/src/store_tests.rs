use chrono::{DateTime, FixedOffset};
use rust_decimal_macros::dec;
use budgetly_core::{BudgetPlanner, CurrencyPair};
use rstest::rstest;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use std::sync::Arc;
use uuid::Uuid;

use super::*;

fn timestamp() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2025-03-01T08:00:00+00:00").unwrap()
}

fn set_local() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 0,
    }
}

fn updated(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn budget_row(user_id: Uuid, year: Option<i32>, month: Option<i16>) -> monthly_budgets::Model {
    monthly_budgets::Model {
        id: Uuid::now_v7(),
        user_id,
        is_template: year.is_none(),
        year,
        month,
        salary_income: dec!(3000),
        bonus_income: Decimal::ZERO,
        extra_income: Decimal::ZERO,
        rent: dec!(1000),
        utilities: Decimal::ZERO,
        groceries: Decimal::ZERO,
        transport: Decimal::ZERO,
        entertainment: Decimal::ZERO,
        shopping: Decimal::ZERO,
        miscellaneous: Decimal::ZERO,
        foreign_expenses: Decimal::ZERO,
        savings: Decimal::ZERO,
        actual_salary_income: Decimal::ZERO,
        actual_bonus_income: Decimal::ZERO,
        actual_extra_income: Decimal::ZERO,
        actual_rent: dec!(950),
        actual_utilities: Decimal::ZERO,
        actual_groceries: Decimal::ZERO,
        actual_transport: Decimal::ZERO,
        actual_entertainment: Decimal::ZERO,
        actual_shopping: Decimal::ZERO,
        actual_miscellaneous: Decimal::ZERO,
        actual_foreign_expenses: Decimal::ZERO,
        actual_savings: Decimal::ZERO,
        total_income: dec!(3000),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

fn ledger_row(user_id: Uuid) -> foreign_expenses::Model {
    foreign_expenses::Model {
        id: Uuid::now_v7(),
        user_id,
        year: 2025,
        month: 3,
        items: serde_json::json!([{ "label": "Bills", "amount": "550" }]),
        exchange_rate: dec!(5.5),
        total_foreign: dec!(550),
        total_primary: dec!(100),
        foreign_currency: "BRL".to_string(),
        primary_currency: "EUR".to_string(),
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

fn march() -> BudgetMonth {
    BudgetMonth::new(2025, 3).unwrap()
}

// ============================================================
// SQL construction
// ============================================================

#[test]
fn test_insert_month_sql_does_nothing_on_conflict() {
    let sql = insert_month_sql();

    assert!(sql.starts_with("INSERT INTO monthly_budgets (id, user_id, is_template, year, month, salary_income,"));
    assert!(sql.ends_with(
        "ON CONFLICT (user_id, year, month) WHERE NOT is_template DO NOTHING RETURNING *"
    ));
    assert!(sql.contains("actual_foreign_expenses"));
    assert!(sql.contains("$30)"));
    assert!(!sql.contains("$31"));
}

#[test]
fn test_upsert_template_sql_only_replaces_planned() {
    let sql = upsert_template_sql();

    assert!(sql.contains("ON CONFLICT (user_id) WHERE is_template DO UPDATE SET"));
    assert!(sql.contains("salary_income = EXCLUDED.salary_income"));
    assert!(sql.contains("total_income = EXCLUDED.total_income"));
    assert!(sql.contains("updated_at = now()"));
    assert!(!sql.contains("actual_rent = EXCLUDED"));
}

#[test]
fn test_row_values_match_placeholders() {
    let planned = Amounts::ZERO.with(BudgetField::Rent, dec!(1000));
    let values = row_values(
        BudgetId::new(),
        UserId::new(),
        Some(march()),
        &planned,
        &Amounts::ZERO,
        Decimal::ZERO,
    );

    assert_eq!(values.len(), 30);
    assert_eq!(values[2], Value::from(false));
    assert_eq!(values[3], Value::from(Some(2025)));
    assert_eq!(values[4], Value::from(Some(3i16)));
    assert_eq!(values[8], Value::from(dec!(1000)));
}

#[test]
fn test_template_row_values_have_no_month() {
    let values = row_values(BudgetId::new(), UserId::new(), None, &Amounts::ZERO, &Amounts::ZERO, Decimal::ZERO);

    assert_eq!(values[2], Value::from(true));
    assert_eq!(values[3], Value::from(None::<i32>));
    assert_eq!(values[4], Value::from(None::<i16>));
}

#[test]
fn test_every_field_has_an_actual_column() {
    for spec in &FIELD_SCHEMA {
        assert!(actual_column(spec.field).is_ok(), "{}", spec.actual_key);
    }
}

#[rstest]
#[case("22003", true)]
#[case("22P02", true)]
#[case("23514", true)]
#[case("23505", true)]
#[case("40001", false)]
#[case("08006", false)]
#[case("57014", false)]
fn test_input_sqlstates_are_rejections(#[case] code: &str, #[case] rejected: bool) {
    assert_eq!(rejects_input(code), rejected);
}

#[test]
fn test_errors_without_sqlstate_stay_backend() {
    let err = store_err(DbErr::Custom("pool timed out".to_string()));
    assert!(matches!(err, StoreError::Backend(message) if message.contains("pool timed out")));
}

#[test]
fn test_month_of_rejects_template_rows() {
    assert!(month_of(None, None).is_err());
    assert_eq!(month_of(Some(2025), Some(3)).unwrap(), march());
    assert!(month_of(Some(2025), Some(13)).is_err());
}

// ============================================================
// Store operations against a mock connection
// ============================================================

#[tokio::test]
async fn test_find_template_maps_row() {
    let user = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([set_local()])
        .append_query_results([vec![budget_row(user, None, None)]])
        .into_connection();

    let template = PgBudgetStore::new(db)
        .find_template(UserId::from_uuid(user))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(template.user_id, UserId::from_uuid(user));
    assert_eq!(template.planned.salary_income, dec!(3000));
    assert_eq!(template.planned.rent, dec!(1000));
    assert_eq!(template.total_income, dec!(3000));
}

#[tokio::test]
async fn test_find_template_with_two_rows_is_duplicate() {
    let user = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([set_local()])
        .append_query_results([vec![budget_row(user, None, None), budget_row(user, None, None)]])
        .into_connection();

    let err = PgBudgetStore::new(db)
        .find_template(UserId::from_uuid(user))
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::Duplicate { what: "budget template" });
}

#[tokio::test]
async fn test_find_monthly_budget_maps_row() {
    let user = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([set_local()])
        .append_query_results([vec![budget_row(user, Some(2025), Some(3))]])
        .into_connection();

    let budget = PgBudgetStore::new(db)
        .find_monthly_budget(UserId::from_uuid(user), march())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(budget.month, march());
    assert_eq!(budget.planned.rent, dec!(1000));
    assert_eq!(budget.actual.rent, dec!(950));
}

#[tokio::test]
async fn test_insert_conflict_returns_existing_row() {
    let user = Uuid::now_v7();
    let existing = budget_row(user, Some(2025), Some(3));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([set_local()])
        // The conditional insert returns nothing, the follow-up select finds the winner.
        .append_query_results([vec![], vec![existing.clone()]])
        .into_connection();

    let new_budget = NewMonthlyBudget {
        user_id: UserId::from_uuid(user),
        month: march(),
        planned: Amounts::ZERO,
        actual: Amounts::ZERO,
        total_income: Decimal::ZERO,
    };
    let budget = PgBudgetStore::new(db)
        .insert_monthly_budget(&new_budget)
        .await
        .unwrap();

    assert_eq!(budget.id, BudgetId::from_uuid(existing.id));
    assert_eq!(budget.planned.rent, dec!(1000));
}

#[tokio::test]
async fn test_update_actuals_without_budget() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([set_local(), updated(0)])
        .into_connection();

    let result = PgBudgetStore::new(db)
        .update_actuals(UserId::new(), march(), &[(BudgetField::Rent, dec!(10))])
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_actuals_returns_updated_row() {
    let user = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([set_local(), updated(1)])
        .append_query_results([vec![budget_row(user, Some(2025), Some(3))]])
        .into_connection();

    let budget = PgBudgetStore::new(db)
        .update_actuals(UserId::from_uuid(user), march(), &[(BudgetField::Rent, dec!(950))])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(budget.actual.rent, dec!(950));
}

#[tokio::test]
async fn test_record_foreign_ledger_without_budget() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([set_local(), updated(0)])
        .into_connection();

    let ledger = NewForeignLedger {
        user_id: UserId::new(),
        month: march(),
        items: vec![ForeignExpenseItem::new("Bills", dec!(550))],
        exchange_rate: dec!(5.5),
        total_foreign: Money::new(dec!(550), Currency::Brl),
        total_primary: Money::new(dec!(100), Currency::Eur),
    };
    let result = PgBudgetStore::new(db).record_foreign_ledger(&ledger).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_record_foreign_ledger_maps_saved_row() {
    let user = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([set_local(), updated(1)])
        .append_query_results([vec![ledger_row(user)]])
        .into_connection();

    let ledger = NewForeignLedger {
        user_id: UserId::from_uuid(user),
        month: march(),
        items: vec![ForeignExpenseItem::new("Bills", dec!(550))],
        exchange_rate: dec!(5.5),
        total_foreign: Money::new(dec!(550), Currency::Brl),
        total_primary: Money::new(dec!(100), Currency::Eur),
    };
    let saved = PgBudgetStore::new(db)
        .record_foreign_ledger(&ledger)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(saved.items, ledger.items);
    assert_eq!(saved.total_primary, Money::new(dec!(100), Currency::Eur));
    assert_eq!(saved.total_foreign.currency, Currency::Brl);
    assert_eq!(saved.month, march());
}

#[tokio::test]
async fn test_backend_failure_is_reported() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_errors([DbErr::Custom("connection refused".to_string())])
        .into_connection();

    let err = PgBudgetStore::new(db)
        .find_template(UserId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Backend(message) if message.contains("connection refused")));
}

#[tokio::test]
async fn test_rematerializing_keeps_recorded_actuals() {
    let user = Uuid::now_v7();
    let mut fresh = budget_row(user, Some(2025), Some(3));
    fresh.actual_rent = Decimal::ZERO;
    let mut recorded = fresh.clone();
    recorded.actual_rent = dec!(950);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // find month, find template, insert, update actuals (+ row count), find month
        .append_exec_results([set_local(), set_local(), set_local(), set_local(), updated(1), set_local()])
        .append_query_results([
            vec![],
            vec![budget_row(user, None, None)],
            vec![fresh.clone()],
            vec![recorded.clone()],
            vec![recorded],
        ])
        .into_connection();
    let planner = BudgetPlanner::new(
        Arc::new(PgBudgetStore::new(db)),
        CurrencyPair {
            primary: Currency::Eur,
            foreign: Currency::Brl,
        },
    );
    let user = UserId::from_uuid(user);

    let created = planner.ensure_budget(Some(user), march()).await.unwrap();
    assert_eq!(created.actual.rent, Decimal::ZERO);

    let mut actuals = budgetly_core::budget::FormValues::new();
    actuals.insert("rent".to_string(), dec!(950));
    planner.record_actuals(Some(user), march(), &actuals).await.unwrap();

    let again = planner.ensure_budget(Some(user), march()).await.unwrap();
    assert_eq!(again.id, created.id);
    assert_eq!(again.id, BudgetId::from_uuid(fresh.id));
    assert_eq!(again.actual.rent, dec!(950));
}
