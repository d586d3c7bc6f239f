//! Fund transfer routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use khata_core::transfer::{TransferError, TransferRequest};
use khata_db::TransferRepository;
use khata_db::entities::{bank_transactions, sea_orm_active_enums};
use khata_shared::types::BankAccountId;

use super::error_response;
use crate::AppState;

/// Creates the fund transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/fund-transfers", post(transfer))
}

/// Request body for a fund transfer.
#[derive(Debug, Deserialize)]
pub struct FundTransferRequest {
    /// Source money account.
    pub from_account_id: Uuid,
    /// Destination money account.
    pub to_account_id: Uuid,
    /// Amount to move (must be positive).
    pub amount: Decimal,
    /// Business date of the transfer. Defaults to today.
    pub date: Option<NaiveDate>,
    /// Human-readable description.
    pub description: String,
    /// Client-supplied reference shared by both transactions; replaying
    /// it returns the recorded transfer without new writes.
    pub reference: String,
}

/// Response for one side of a transfer.
#[derive(Debug, Serialize)]
pub struct MovementResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// The money account moved.
    pub bank_account_id: Uuid,
    /// Deposit or withdrawal.
    pub direction: String,
    /// Amount moved.
    pub amount: String,
    /// Business date.
    pub date: String,
    /// Shared reference.
    pub reference: String,
}

impl From<bank_transactions::Model> for MovementResponse {
    fn from(t: bank_transactions::Model) -> Self {
        let direction = match t.direction {
            sea_orm_active_enums::BankTxnDirection::Deposit => "deposit",
            sea_orm_active_enums::BankTxnDirection::Withdrawal => "withdrawal",
        };
        Self {
            id: t.id,
            bank_account_id: t.bank_account_id,
            direction: direction.to_string(),
            amount: t.amount.to_string(),
            date: t.date.to_string(),
            reference: t.reference,
        }
    }
}

/// POST `/fund-transfers` - Move funds between two money accounts.
///
/// Writes a withdrawal and a deposit sharing the reference, atomically
/// with both balance updates.
async fn transfer(
    State(state): State<AppState>,
    Json(payload): Json<FundTransferRequest>,
) -> Response {
    if payload.reference.trim().is_empty() {
        return error_response(400, "MISSING_REFERENCE", "A transfer reference is required");
    }

    let request = TransferRequest {
        from_account_id: BankAccountId::from_uuid(payload.from_account_id),
        to_account_id: BankAccountId::from_uuid(payload.to_account_id),
        amount: payload.amount,
        date: payload.date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
        description: payload.description,
        reference: payload.reference,
    };

    let repo = TransferRepository::new((*state.db).clone());
    match repo.transfer(request).await {
        Ok(outcome) => {
            let status = if outcome.replayed {
                StatusCode::OK
            } else {
                info!(
                    withdrawal_id = %outcome.withdrawal.id,
                    deposit_id = %outcome.deposit.id,
                    reference = %outcome.withdrawal.reference,
                    "Fund transfer recorded"
                );
                StatusCode::CREATED
            };
            (
                status,
                Json(json!({
                    "withdrawal": MovementResponse::from(outcome.withdrawal),
                    "deposit": MovementResponse::from(outcome.deposit),
                    "from_balance_after": outcome.from_balance_after.to_string(),
                    "to_balance_after": outcome.to_balance_after.to_string(),
                    "replayed": outcome.replayed,
                })),
            )
                .into_response()
        }
        Err(e) => transfer_error(&e),
    }
}

fn transfer_error(e: &TransferError) -> Response {
    if e.http_status_code() >= 500 {
        error!(error = %e, "Fund transfer failed");
    }
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}
