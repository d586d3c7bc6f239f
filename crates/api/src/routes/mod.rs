//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

pub mod accounts;
pub mod aging;
pub mod bank_accounts;
pub mod bills;
pub mod fund_transfers;
pub mod health;
pub mod journal_entries;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(journal_entries::routes())
        .merge(bills::routes())
        .merge(bank_accounts::routes())
        .merge(fund_transfers::routes())
        .merge(aging::routes())
}

/// Builds the `{"error": code, "message": ...}` body every handler uses
/// when a domain error surfaces.
pub(crate) fn error_response(status: u16, code: &str, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}
