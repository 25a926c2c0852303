//! Foreign expense routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use budgetly_core::{
    CurrencyPair,
    foreign::{ForeignExpenseItem, ForeignExpenseLedger},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::budget_month;
use crate::{AppState, error::ApiResult, middleware::CurrentUser};

/// Creates the foreign expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/budgets/{year}/{month}/foreign-expenses",
        get(get_foreign_expenses).put(record_foreign_expenses),
    )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for recording a month's foreign expenses.
#[derive(Debug, Deserialize)]
pub struct RecordForeignExpensesRequest {
    /// Expense items in the foreign currency.
    pub items: Vec<ForeignExpenseItem>,
    /// Foreign units per primary unit.
    pub exchange_rate: Decimal,
}

/// Response for a month's foreign expenses.
#[derive(Debug, Serialize)]
pub struct ForeignExpensesResponse {
    /// Primary and foreign currency.
    pub currencies: CurrencyPair,
    /// Stored ledger, if any.
    pub ledger: Option<ForeignExpenseLedger>,
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn get_foreign_expenses(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<ForeignExpensesResponse>> {
    let month = budget_month(year, month)?;
    let ledger = state.planner.get_foreign_expenses(identity, month).await?;
    Ok(Json(ForeignExpensesResponse {
        currencies: state.planner.currencies(),
        ledger,
    }))
}

async fn record_foreign_expenses(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path((year, month)): Path<(i32, u32)>,
    Json(payload): Json<RecordForeignExpensesRequest>,
) -> ApiResult<Json<ForeignExpensesResponse>> {
    let month = budget_month(year, month)?;
    let ledger = state
        .planner
        .record_foreign_expenses(identity, month, payload.items, payload.exchange_rate)
        .await?;
    Ok(Json(ForeignExpensesResponse {
        currencies: state.planner.currencies(),
        ledger: Some(ledger),
    }))
}
