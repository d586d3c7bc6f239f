//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
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

use khata_core::chart::{Account, AccountType, ChartError};
use khata_db::repositories::reporting::ReportingError;
use khata_db::{AccountRepository, ReportingRepository};
use khata_db::repositories::account::{AccountFilter, CreateAccountInput};
use khata_shared::types::AccountId;

use super::error_response;
use crate::AppState;

/// Creates the chart of accounts routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/balances", get(account_balances))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}/deactivate", post(deactivate_account))
        .route("/accounts/{account_id}/balance", get(balance_as_of))
        .route("/accounts/{account_id}/balance/verify", get(verify_balance))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Filter by active status.
    pub active: Option<bool>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code (must be unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Parent account ID for hierarchical structure.
    pub parent_account_id: Option<Uuid>,
    /// Balance carried in at setup (default: 0).
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Side on which the account naturally increases.
    pub normal_balance: String,
    /// Parent account ID.
    pub parent_account_id: Option<Uuid>,
    /// Balance carried in at setup.
    pub opening_balance: String,
    /// Cached balance.
    pub current_balance: String,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id.into_inner(),
            normal_balance: format!("{:?}", a.normal_balance()).to_lowercase(),
            code: a.code,
            name: a.name,
            account_type: a.account_type.to_string(),
            parent_account_id: a.parent_account_id.map(AccountId::into_inner),
            opening_balance: a.opening_balance.to_string(),
            current_balance: a.current_balance.to_string(),
            is_active: a.is_active,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Query parameters for balance reports.
#[derive(Debug, Deserialize)]
pub struct BalancesQuery {
    /// Date to compute balances as of (YYYY-MM-DD). Defaults to the
    /// cached balances when absent.
    pub as_of: Option<NaiveDate>,
    /// Restrict the report to one account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

/// Query parameters for a single-account balance.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Date to compute the balance as of (YYYY-MM-DD). Defaults to today.
    pub as_of: Option<NaiveDate>,
}

/// GET `/accounts` - List accounts, ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Response {
    let account_type = match parse_type(query.account_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return response,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let filter = AccountFilter {
        account_type,
        is_active: query.active,
    };

    match repo.list_accounts(filter).await {
        Ok(accounts) => {
            let accounts: Vec<AccountResponse> =
                accounts.into_iter().map(AccountResponse::from).collect();
            (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
        }
        Err(e) => chart_error(&e),
    }
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Response {
    let Ok(account_type) = payload.account_type.parse::<AccountType>() else {
        return error_response(
            400,
            "INVALID_ACCOUNT_TYPE",
            "Account type must be one of: asset, liability, equity, revenue, expense",
        );
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        code: payload.code,
        name: payload.name,
        account_type,
        parent_account_id: payload.parent_account_id.map(AccountId::from_uuid),
        opening_balance: payload.opening_balance,
    };

    match repo.create_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, code = %account.code, "Account created");
            (StatusCode::CREATED, Json(AccountResponse::from(account))).into_response()
        }
        Err(e) => chart_error(&e),
    }
}

/// GET `/accounts/{account_id}` - Get a single account.
async fn get_account(State(state): State<AppState>, Path(account_id): Path<Uuid>) -> Response {
    let repo = AccountRepository::new((*state.db).clone());
    match repo.find_by_id(AccountId::from_uuid(account_id)).await {
        Ok(account) => (StatusCode::OK, Json(AccountResponse::from(account))).into_response(),
        Err(e) => chart_error(&e),
    }
}

/// POST `/accounts/{account_id}/deactivate` - Deactivate an account.
///
/// Accounts with postings or active children are refused; history is
/// never deleted.
async fn deactivate_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Response {
    let repo = AccountRepository::new((*state.db).clone());
    match repo.deactivate(AccountId::from_uuid(account_id)).await {
        Ok(account) => {
            info!(account_id = %account.id, "Account deactivated");
            (StatusCode::OK, Json(AccountResponse::from(account))).into_response()
        }
        Err(e) => chart_error(&e),
    }
}

/// GET `/accounts/balances` - Balances with per-type roll-up.
async fn account_balances(
    State(state): State<AppState>,
    Query(query): Query<BalancesQuery>,
) -> Response {
    let account_type = match parse_type(query.account_type.as_deref()) {
        Ok(t) => t,
        Err(response) => return response,
    };

    let repo = ReportingRepository::new((*state.db).clone());
    let summary = match repo.financial_summary(query.as_of).await {
        Ok(summary) => summary,
        Err(e) => return reporting_error(&e),
    };

    match account_type {
        Some(t) => {
            let section = match t {
                AccountType::Asset => &summary.assets,
                AccountType::Liability => &summary.liabilities,
                AccountType::Equity => &summary.equity,
                AccountType::Revenue => &summary.revenue,
                AccountType::Expense => &summary.expenses,
            };
            (
                StatusCode::OK,
                Json(json!({
                    "as_of": query.as_of,
                    "type": t.to_string(),
                    "total": section.total,
                    "accounts": section.accounts,
                })),
            )
                .into_response()
        }
        None => (
            StatusCode::OK,
            Json(json!({ "as_of": query.as_of, "summary": summary })),
        )
            .into_response(),
    }
}

/// GET `/accounts/{account_id}/balance` - Balance derived from the line log.
async fn balance_as_of(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<BalanceQuery>,
) -> Response {
    let as_of = query.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let repo = ReportingRepository::new((*state.db).clone());

    match repo.balance_as_of(AccountId::from_uuid(account_id), as_of).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({
                "account_id": account_id,
                "as_of": as_of,
                "balance": balance.to_string(),
            })),
        )
            .into_response(),
        Err(e) => reporting_error(&e),
    }
}

/// GET `/accounts/{account_id}/balance/verify` - Check the cached balance
/// against the line log.
async fn verify_balance(State(state): State<AppState>, Path(account_id): Path<Uuid>) -> Response {
    let repo = ReportingRepository::new((*state.db).clone());
    match repo.verify_cached_balance(AccountId::from_uuid(account_id)).await {
        Ok(balance) => (
            StatusCode::OK,
            Json(json!({
                "account_id": account_id,
                "balance": balance.to_string(),
                "consistent": true,
            })),
        )
            .into_response(),
        Err(e) => reporting_error(&e),
    }
}

fn parse_type(raw: Option<&str>) -> Result<Option<AccountType>, Response> {
    match raw {
        None => Ok(None),
        Some(s) => s.parse::<AccountType>().map(Some).map_err(|_| {
            error_response(
                400,
                "INVALID_ACCOUNT_TYPE",
                "Account type must be one of: asset, liability, equity, revenue, expense",
            )
        }),
    }
}

fn chart_error(e: &ChartError) -> Response {
    if e.http_status_code() >= 500 {
        error!(error = %e, "Chart of accounts operation failed");
    }
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}

fn reporting_error(e: &ReportingError) -> Response {
    if e.http_status_code() >= 500 {
        error!(error = %e, "Reporting query failed");
    }
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}
