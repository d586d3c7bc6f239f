//! Aging report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::error;

use khata_db::ReportingRepository;
use khata_db::repositories::reporting::ReportingError;

use super::error_response;
use crate::AppState;

/// Creates the aging report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/aging-reports", get(aging_report))
}

/// Query parameters for the aging report.
#[derive(Debug, Deserialize)]
pub struct AgingQuery {
    /// Date to age outstanding bills against (YYYY-MM-DD). Defaults to
    /// today.
    pub as_of: Option<NaiveDate>,
}

/// GET `/aging-reports` - Receivables and payables bucketed by days
/// outstanding.
async fn aging_report(State(state): State<AppState>, Query(query): Query<AgingQuery>) -> Response {
    let as_of = query.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let repo = ReportingRepository::new((*state.db).clone());

    match repo.aging_report(as_of).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => reporting_error(&e),
    }
}

fn reporting_error(e: &ReportingError) -> Response {
    if e.http_status_code() >= 500 {
        error!(error = %e, "Aging report failed");
    }
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}
