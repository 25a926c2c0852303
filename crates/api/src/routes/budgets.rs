//! Monthly budget routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use budgetly_core::budget::{BudgetMonth, BudgetSummary, FormValues, MonthlyBudget};
use budgetly_shared::AppError;
use serde::Serialize;
use tracing::info;

use super::budget_month;
use crate::{AppState, error::ApiResult, middleware::CurrentUser};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets/current", post(materialize_current))
        .route(
            "/budgets/{year}/{month}",
            get(get_budget).post(materialize_month),
        )
        .route("/budgets/{year}/{month}/summary", get(get_summary))
        .route("/budgets/{year}/{month}/actuals", patch(update_actuals))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a monthly budget.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// The budget.
    #[serde(flatten)]
    pub budget: MonthlyBudget,
    /// Two-digit month, e.g. `"03"`.
    pub month_code: String,
    /// Month before, for navigation.
    pub previous: Option<BudgetMonth>,
    /// Month after, for navigation.
    pub next: Option<BudgetMonth>,
}

impl From<MonthlyBudget> for BudgetResponse {
    fn from(budget: MonthlyBudget) -> Self {
        Self {
            month_code: budget.month.code(),
            previous: budget.month.previous(),
            next: budget.month.next(),
            budget,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn materialize_current(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> ApiResult<Json<BudgetResponse>> {
    let budget = state
        .planner
        .materialize_current_month(identity, state.timezone)
        .await?;
    info!(month = %budget.month, "Current month requested");
    Ok(Json(budget.into()))
}

async fn materialize_month(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<BudgetResponse>> {
    let month = budget_month(year, month)?;
    let budget = state.planner.ensure_budget(identity, month).await?;
    Ok(Json(budget.into()))
}

async fn get_budget(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<BudgetResponse>> {
    let month = budget_month(year, month)?;
    let budget = state
        .planner
        .get_monthly_budget(identity, month)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No budget exists for {month}")))?;
    Ok(Json(budget.into()))
}

async fn get_summary(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<BudgetSummary>> {
    let month = budget_month(year, month)?;
    let summary = state.planner.summarize(identity, month).await?;
    Ok(Json(summary))
}

async fn update_actuals(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path((year, month)): Path<(i32, u32)>,
    Json(actuals): Json<FormValues>,
) -> ApiResult<Json<BudgetResponse>> {
    let month = budget_month(year, month)?;
    let budget = state.planner.record_actuals(identity, month, &actuals).await?;
    Ok(Json(budget.into()))
}
