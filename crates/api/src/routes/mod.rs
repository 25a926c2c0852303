//! API route definitions.

use axum::{Router, middleware};
use budgetly_core::{PlannerError, budget::BudgetMonth};

use crate::{AppState, error::ApiError, middleware::auth_middleware};

pub mod budgets;
pub mod foreign_expenses;
pub mod health;
pub mod schema;
pub mod template;


/// Creates the API router with the budget routes behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let budget_routes = Router::new()
        .merge(template::routes())
        .merge(budgets::routes())
        .merge(foreign_expenses::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(schema::routes())
        .merge(budget_routes)
}

/// Parses the `{year}/{month}` path segments.
pub(crate) fn budget_month(year: i32, month: u32) -> Result<BudgetMonth, ApiError> {
    BudgetMonth::new(year, month).map_err(|e| PlannerError::from(e).into())
}
