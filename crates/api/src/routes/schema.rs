//! Field schema used by clients to render budget forms.

use axum::{Json, Router, extract::State, routing::get};
use budgetly_core::{
    CurrencyPair,
    budget::{FIELD_SCHEMA, FieldSpec},
};
use serde::Serialize;

use crate::AppState;

/// Schema response.
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    /// Primary and foreign currency.
    pub currencies: CurrencyPair,
    /// Budget categories in display order.
    pub fields: &'static [FieldSpec],
}

async fn get_schema(State(state): State<AppState>) -> Json<SchemaResponse> {
    Json(SchemaResponse {
        currencies: state.planner.currencies(),
        fields: &FIELD_SCHEMA,
    })
}

/// Creates schema routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/schema", get(get_schema))
}
