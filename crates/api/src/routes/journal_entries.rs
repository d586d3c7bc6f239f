//! Journal entry routes: posting, reversal, and reads.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use khata_core::chart::ChartError;
use khata_core::journal::{JournalError, LineInput, PostEntryInput};
use khata_db::entities::{journal_entries, journal_lines, sea_orm_active_enums};
use khata_db::repositories::journal::PostedEntry;
use khata_db::{AccountRepository, JournalRepository};
use khata_shared::types::JournalEntryId;

use super::error_response;
use crate::AppState;

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", get(list_entries))
        .route("/journal-entries", post(post_entry))
        .route("/journal-entries/{entry_id}", get(get_entry))
        .route("/journal-entries/{entry_id}/reverse", post(reverse_entry))
}

/// One line of a journal entry request. Accounts are named by code;
/// exactly one of debit/credit must be nonzero.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// Account code from the chart of accounts.
    pub account_code: String,
    /// Debit amount (default: 0).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (default: 0).
    #[serde(default)]
    pub credit: Decimal,
    /// Optional memo for this line.
    pub memo: Option<String>,
}

/// Request body for posting a journal entry.
#[derive(Debug, Deserialize)]
pub struct PostEntryRequest {
    /// Business date of the entry.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Optional reference (bill number, transfer reference, ...).
    pub reference: Option<String>,
    /// The journal lines (at least 2).
    pub lines: Vec<LineRequest>,
}

/// Request body for reversing a posted entry.
#[derive(Debug, Default, Deserialize)]
pub struct ReverseEntryRequest {
    /// Business date of the reversal. Defaults to today.
    pub entry_date: Option<NaiveDate>,
    /// Description override for the reversal entry.
    pub description: Option<String>,
}

/// Response for a journal entry header.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Allocated journal number (`JRNL-<year>-<sequence>`).
    pub journal_number: String,
    /// Business date.
    pub entry_date: String,
    /// Description.
    pub description: String,
    /// Reference, if any.
    pub reference: Option<String>,
    /// Entry status.
    pub status: String,
    /// Sum of debit amounts.
    pub total_debit: String,
    /// Sum of credit amounts.
    pub total_credit: String,
    /// The entry this one reverses, if any.
    pub reverses_entry_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Response for a journal line.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    /// Line ID.
    pub id: Uuid,
    /// Account posted to.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: String,
    /// Credit amount.
    pub credit: String,
    /// Signed effect on the account's balance.
    pub balance_change: String,
    /// Memo, if any.
    pub memo: Option<String>,
}

impl From<journal_entries::Model> for EntryResponse {
    fn from(e: journal_entries::Model) -> Self {
        let status = match e.status {
            sea_orm_active_enums::JournalStatus::Draft => "draft",
            sea_orm_active_enums::JournalStatus::Posted => "posted",
        };
        Self {
            id: e.id,
            journal_number: e.journal_number,
            entry_date: e.entry_date.to_string(),
            description: e.description,
            reference: e.reference,
            status: status.to_string(),
            total_debit: e.total_debit.to_string(),
            total_credit: e.total_credit.to_string(),
            reverses_entry_id: e.reverses_entry_id,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

impl From<journal_lines::Model> for LineResponse {
    fn from(l: journal_lines::Model) -> Self {
        Self {
            id: l.id,
            account_id: l.account_id,
            debit: l.debit.to_string(),
            credit: l.credit.to_string(),
            balance_change: l.balance_change.to_string(),
            memo: l.memo,
        }
    }
}

fn posted_entry_json(posted: PostedEntry) -> serde_json::Value {
    let lines: Vec<LineResponse> = posted.lines.into_iter().map(LineResponse::from).collect();
    let entry = EntryResponse::from(posted.entry);
    json!({ "entry": entry, "lines": lines })
}

/// POST `/journal-entries` - Validate and post a balanced entry.
async fn post_entry(
    State(state): State<AppState>,
    Json(payload): Json<PostEntryRequest>,
) -> Response {
    let account_repo = AccountRepository::new((*state.db).clone());

    // Resolve codes to typed ids up front; everything past this point
    // works on ids only.
    let mut lines = Vec::with_capacity(payload.lines.len());
    for line in payload.lines {
        let account = match account_repo.find_by_code(&line.account_code).await {
            Ok(account) => account,
            Err(ChartError::NotFound(_)) => {
                return error_response(
                    404,
                    "ACCOUNT_NOT_FOUND",
                    &format!("No account with code '{}'", line.account_code),
                );
            }
            Err(e) => return chart_error(&e),
        };
        lines.push(LineInput {
            account_id: account.id,
            debit: line.debit,
            credit: line.credit,
            memo: line.memo,
        });
    }

    let input = PostEntryInput {
        entry_date: payload.entry_date,
        description: payload.description,
        reference: payload.reference,
        reverses_entry_id: None,
        lines,
    };

    let repo = JournalRepository::new((*state.db).clone());
    match repo.post_entry(&input).await {
        Ok(posted) => {
            info!(
                entry_id = %posted.entry.id,
                journal_number = %posted.entry.journal_number,
                "Journal entry posted"
            );
            (StatusCode::CREATED, Json(posted_entry_json(posted))).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

/// POST `/journal-entries/{entry_id}/reverse` - Post a compensating entry.
///
/// The original entry stays untouched; the reversal carries swapped
/// debit/credit lines and points back at it.
async fn reverse_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    payload: Option<Json<ReverseEntryRequest>>,
) -> Response {
    let Json(payload) = payload.unwrap_or_default();
    let entry_date = payload
        .entry_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let repo = JournalRepository::new((*state.db).clone());
    match repo
        .reverse_entry(
            JournalEntryId::from_uuid(entry_id),
            entry_date,
            payload.description,
        )
        .await
    {
        Ok(posted) => {
            info!(
                original_id = %entry_id,
                reversal_id = %posted.entry.id,
                "Journal entry reversed"
            );
            (StatusCode::CREATED, Json(posted_entry_json(posted))).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

/// GET `/journal-entries` - List entries, newest business date first.
async fn list_entries(State(state): State<AppState>) -> Response {
    let repo = JournalRepository::new((*state.db).clone());
    match repo.list_entries().await {
        Ok(entries) => {
            let entries: Vec<EntryResponse> =
                entries.into_iter().map(EntryResponse::from).collect();
            (StatusCode::OK, Json(json!({ "entries": entries }))).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

/// GET `/journal-entries/{entry_id}` - Get an entry with its lines.
async fn get_entry(State(state): State<AppState>, Path(entry_id): Path<Uuid>) -> Response {
    let repo = JournalRepository::new((*state.db).clone());
    match repo.get_entry(JournalEntryId::from_uuid(entry_id)).await {
        Ok(posted) => (StatusCode::OK, Json(posted_entry_json(posted))).into_response(),
        Err(e) => journal_error(&e),
    }
}

fn journal_error(e: &JournalError) -> Response {
    if e.http_status_code() >= 500 {
        error!(error = %e, "Journal operation failed");
    }
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}

fn chart_error(e: &ChartError) -> Response {
    if e.http_status_code() >= 500 {
        error!(error = %e, "Account lookup failed");
    }
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}
