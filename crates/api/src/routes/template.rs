//! Budget template routes.
//!
//! Saving over an existing template is two-phase: the first `PUT` answers
//! `409 Conflict` with both versions side by side and writes nothing, and
//! the client resubmits with `confirm_overwrite: true` to commit.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use budgetly_core::{
    TemplateSubmission,
    budget::{Amounts, BudgetTemplate, FormValues},
    template::{FieldComparison, compare},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiResult, middleware::CurrentUser};

/// Creates the template routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/template", get(get_template).put(save_template))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for saving the template.
#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    /// Planned amounts keyed by category.
    pub values: FormValues,
    /// Replace an existing template.
    #[serde(default)]
    pub confirm_overwrite: bool,
}

/// Response for reading the template.
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    /// Stored template, if any.
    pub template: Option<BudgetTemplate>,
}

/// Response for a save that needs confirmation.
#[derive(Debug, Serialize)]
pub struct AwaitingConfirmationResponse {
    /// Always `awaiting_confirmation`.
    pub status: &'static str,
    /// Stored template.
    pub current: BudgetTemplate,
    /// Values that would replace it.
    pub pending: Amounts,
    /// Per-category comparison of both versions.
    pub comparison: Vec<FieldComparison>,
}

/// Response for a committed save.
#[derive(Debug, Serialize)]
pub struct SavedTemplateResponse {
    /// Always `saved`.
    pub status: &'static str,
    /// Stored template.
    pub template: BudgetTemplate,
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn get_template(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> ApiResult<Json<TemplateResponse>> {
    let template = state.planner.get_template(identity).await?;
    Ok(Json(TemplateResponse { template }))
}

async fn save_template(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<SaveTemplateRequest>,
) -> ApiResult<Response> {
    let submission = state
        .planner
        .submit_template(identity, &payload.values, payload.confirm_overwrite)
        .await?;

    let response = match submission {
        TemplateSubmission::Saved(template) => (
            StatusCode::OK,
            Json(SavedTemplateResponse {
                status: "saved",
                template,
            }),
        )
            .into_response(),
        TemplateSubmission::AwaitingConfirmation { current, pending } => {
            let comparison = compare(&current.planned, &pending);
            (
                StatusCode::CONFLICT,
                Json(AwaitingConfirmationResponse {
                    status: "awaiting_confirmation",
                    current,
                    pending,
                    comparison,
                }),
            )
                .into_response()
        }
    };
    Ok(response)
}
