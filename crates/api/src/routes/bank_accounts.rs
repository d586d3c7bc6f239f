//! Money account routes (bank, UPI, cash).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use khata_core::transfer::BankAccountKind;
use khata_db::TransferRepository;
use khata_db::entities::{bank_accounts, sea_orm_active_enums};
use khata_db::repositories::transfer::CreateBankAccountInput;
use khata_shared::AppError;
use khata_shared::types::BankAccountId;

use super::error_response;
use crate::AppState;

/// Creates the money account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bank-accounts", get(list_bank_accounts))
        .route("/bank-accounts", post(create_bank_account))
        .route("/bank-accounts/{account_id}", get(get_bank_account))
}

/// Request body for creating a money account.
#[derive(Debug, Deserialize)]
pub struct CreateBankAccountRequest {
    /// Display name.
    pub name: String,
    /// Account kind: bank, upi, or cash.
    pub kind: BankAccountKind,
    /// Account number or UPI handle.
    pub account_number: Option<String>,
    /// The bank account a UPI handle draws on (UPI kind only).
    pub linked_account_id: Option<Uuid>,
    /// Balance carried in at setup (default: 0).
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Response for a money account.
#[derive(Debug, Serialize)]
pub struct BankAccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Account kind.
    pub kind: String,
    /// Account number or UPI handle.
    pub account_number: Option<String>,
    /// Linked bank account, if any.
    pub linked_account_id: Option<Uuid>,
    /// Balance carried in at setup.
    pub opening_balance: String,
    /// Cached balance. May go negative; overdrafts are recorded, not
    /// rejected.
    pub current_balance: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<bank_accounts::Model> for BankAccountResponse {
    fn from(a: bank_accounts::Model) -> Self {
        let kind = match a.kind {
            sea_orm_active_enums::BankAccountKind::Bank => "bank",
            sea_orm_active_enums::BankAccountKind::Upi => "upi",
            sea_orm_active_enums::BankAccountKind::Cash => "cash",
        };
        Self {
            id: a.id,
            name: a.name,
            kind: kind.to_string(),
            account_number: a.account_number,
            linked_account_id: a.linked_account_id,
            opening_balance: a.opening_balance.to_string(),
            current_balance: a.current_balance.to_string(),
            is_active: a.is_active,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// POST `/bank-accounts` - Create a money account.
async fn create_bank_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateBankAccountRequest>,
) -> Response {
    let repo = TransferRepository::new((*state.db).clone());
    let input = CreateBankAccountInput {
        name: payload.name,
        kind: payload.kind,
        account_number: payload.account_number,
        linked_account_id: payload.linked_account_id.map(BankAccountId::from_uuid),
        opening_balance: payload.opening_balance,
    };

    match repo.create_bank_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, name = %account.name, "Bank account created");
            (StatusCode::CREATED, Json(BankAccountResponse::from(account))).into_response()
        }
        Err(e) => app_error(&e),
    }
}

/// GET `/bank-accounts` - List money accounts ordered by name.
async fn list_bank_accounts(State(state): State<AppState>) -> Response {
    let repo = TransferRepository::new((*state.db).clone());
    match repo.list_bank_accounts().await {
        Ok(accounts) => {
            let accounts: Vec<BankAccountResponse> =
                accounts.into_iter().map(BankAccountResponse::from).collect();
            (StatusCode::OK, Json(json!({ "bank_accounts": accounts }))).into_response()
        }
        Err(e) => app_error(&e),
    }
}

/// GET `/bank-accounts/{account_id}` - Get a single money account.
async fn get_bank_account(State(state): State<AppState>, Path(account_id): Path<Uuid>) -> Response {
    let repo = TransferRepository::new((*state.db).clone());
    match repo.find_bank_account(BankAccountId::from_uuid(account_id)).await {
        Ok(account) => (StatusCode::OK, Json(BankAccountResponse::from(account))).into_response(),
        Err(e) => app_error(&e),
    }
}

fn app_error(e: &AppError) -> Response {
    if e.status_code() >= 500 {
        error!(error = %e, "Bank account operation failed");
    }
    error_response(e.status_code(), e.error_code(), &e.to_string())
}
