//! Bill and payment routes.

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

use khata_core::billing::{
    Bill, BillKind, BillStatus, BillingError, Payment, PaymentInput, PaymentLedgerAccounts,
    PaymentMethod,
};
use khata_core::chart::ChartError;
use khata_db::repositories::billing::CreateBillInput;
use khata_db::{AccountRepository, BillingRepository};
use khata_shared::types::{BankAccountId, BillId, CounterpartyId};

use super::error_response;
use crate::AppState;

/// Default control account codes from the standard chart. Requests may
/// override them per call.
const ACCOUNTS_RECEIVABLE_CODE: &str = "1200";
const ACCOUNTS_PAYABLE_CODE: &str = "2100";
const CASH_CODE: &str = "1000";

/// Creates the bill routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bills", get(list_bills))
        .route("/bills", post(create_bill))
        .route("/bills/{bill_id}", get(get_bill))
        .route("/bills/{bill_id}/payments", post(record_payment))
        .route("/bills/{bill_id}/mark-paid", post(mark_paid))
}

/// Query parameters for listing bills.
#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    /// Filter by kind: payable or receivable.
    pub kind: Option<BillKind>,
}

/// Request body for creating a bill.
#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    /// Payable (vendor bill) or receivable (customer invoice).
    pub kind: BillKind,
    /// The counterparty, referenced by the ID the CRM assigned.
    pub counterparty_id: Uuid,
    /// Document number.
    pub bill_number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date (must not precede the issue date).
    pub due_date: NaiveDate,
    /// Total amount (must be positive).
    pub total_amount: Decimal,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// Amount to pay (must not exceed the remainder).
    pub amount: Decimal,
    /// Business date of the payment. Defaults to today.
    pub date: Option<NaiveDate>,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// Money account to move funds through, if any.
    pub bank_account_id: Option<Uuid>,
    /// Client-supplied idempotency key; replays return the original
    /// result without writing anything.
    pub idempotency_key: String,
    /// Control account code override.
    pub counterparty_account_code: Option<String>,
    /// Settlement (cash/bank ledger) account code override.
    pub settlement_account_code: Option<String>,
}

/// Request body for marking a bill paid as an adjustment.
#[derive(Debug, Default, Deserialize)]
pub struct MarkPaidRequest {
    /// Control account code override.
    pub counterparty_account_code: Option<String>,
    /// Settlement account code override.
    pub settlement_account_code: Option<String>,
}

/// Response for a bill.
#[derive(Debug, Serialize)]
pub struct BillResponse {
    /// Bill ID.
    pub id: Uuid,
    /// Payable or receivable.
    pub kind: BillKind,
    /// Counterparty ID.
    pub counterparty_id: Uuid,
    /// Document number.
    pub bill_number: String,
    /// Issue date.
    pub issue_date: String,
    /// Due date.
    pub due_date: String,
    /// Total amount.
    pub total_amount: String,
    /// Amount settled so far.
    pub paid_amount: String,
    /// Outstanding remainder.
    pub remaining_amount: String,
    /// Status as of today, with overdue derived from the due date.
    pub status: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Bill> for BillResponse {
    fn from(b: Bill) -> Self {
        let today = chrono::Utc::now().date_naive();
        let status = match b.effective_status(today) {
            BillStatus::Pending => "pending",
            BillStatus::PartiallyPaid => "partially_paid",
            BillStatus::Paid => "paid",
            BillStatus::Overdue => "overdue",
        }
        .to_string();
        Self {
            id: b.id.into_inner(),
            kind: b.kind,
            counterparty_id: b.counterparty_id.into_inner(),
            remaining_amount: b.remaining_amount().to_string(),
            bill_number: b.bill_number,
            issue_date: b.issue_date.to_string(),
            due_date: b.due_date.to_string(),
            total_amount: b.total_amount.to_string(),
            paid_amount: b.paid_amount.to_string(),
            status,
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// Response for a payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// The bill this payment settles (part of).
    pub bill_id: Uuid,
    /// Amount paid.
    pub amount: String,
    /// Business date.
    pub payment_date: String,
    /// Payment method.
    pub method: PaymentMethod,
    /// Money account involved, if any.
    pub bank_account_id: Option<Uuid>,
    /// Client-supplied idempotency key.
    pub idempotency_key: String,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id.into_inner(),
            bill_id: p.bill_id.into_inner(),
            amount: p.amount.to_string(),
            payment_date: p.payment_date.to_string(),
            method: p.method,
            bank_account_id: p.bank_account_id.map(BankAccountId::into_inner),
            idempotency_key: p.idempotency_key,
        }
    }
}

/// POST `/bills` - Create a bill.
async fn create_bill(
    State(state): State<AppState>,
    Json(payload): Json<CreateBillRequest>,
) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    let input = CreateBillInput {
        kind: payload.kind,
        counterparty_id: CounterpartyId::from_uuid(payload.counterparty_id),
        bill_number: payload.bill_number,
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        total_amount: payload.total_amount,
    };

    match repo.create_bill(input).await {
        Ok(bill) => {
            info!(bill_id = %bill.id, bill_number = %bill.bill_number, "Bill created");
            (StatusCode::CREATED, Json(BillResponse::from(bill))).into_response()
        }
        Err(e) => billing_error(&e),
    }
}

/// GET `/bills` - List bills, newest due date first.
async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<ListBillsQuery>,
) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    match repo.list_bills(query.kind).await {
        Ok(bills) => {
            let bills: Vec<BillResponse> = bills.into_iter().map(BillResponse::from).collect();
            (StatusCode::OK, Json(json!({ "bills": bills }))).into_response()
        }
        Err(e) => billing_error(&e),
    }
}

/// GET `/bills/{bill_id}` - Get a single bill.
async fn get_bill(State(state): State<AppState>, Path(bill_id): Path<Uuid>) -> Response {
    let repo = BillingRepository::new((*state.db).clone());
    match repo.get_bill(BillId::from_uuid(bill_id)).await {
        Ok(bill) => (StatusCode::OK, Json(BillResponse::from(bill))).into_response(),
        Err(e) => billing_error(&e),
    }
}

/// POST `/bills/{bill_id}/payments` - Record a payment.
///
/// The bill mutation, the journal posting, the payment row, and the
/// optional bank movement commit together or not at all.
async fn record_payment(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Response {
    let bill_id = BillId::from_uuid(bill_id);
    let billing_repo = BillingRepository::new((*state.db).clone());

    let bill = match billing_repo.get_bill(bill_id).await {
        Ok(bill) => bill,
        Err(e) => return billing_error(&e),
    };

    let ledger = match resolve_ledger_accounts(
        &state,
        bill.kind,
        payload.counterparty_account_code.as_deref(),
        payload.settlement_account_code.as_deref(),
    )
    .await
    {
        Ok(ledger) => ledger,
        Err(response) => return response,
    };

    let input = PaymentInput {
        amount: payload.amount,
        date: payload.date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
        method: payload.method,
        bank_account_id: payload.bank_account_id.map(BankAccountId::from_uuid),
        idempotency_key: payload.idempotency_key,
    };

    match billing_repo.record_payment(bill_id, input, ledger).await {
        Ok(outcome) => {
            let status = if outcome.replayed {
                StatusCode::OK
            } else {
                info!(
                    bill_id = %bill_id,
                    payment_id = %outcome.payment.id,
                    journal_entry_id = %outcome.journal_entry_id,
                    "Payment recorded"
                );
                StatusCode::CREATED
            };
            (
                status,
                Json(json!({
                    "bill": BillResponse::from(outcome.bill),
                    "payment": PaymentResponse::from(outcome.payment),
                    "journal_entry_id": outcome.journal_entry_id.into_inner(),
                    "replayed": outcome.replayed,
                })),
            )
                .into_response()
        }
        Err(e) => billing_error(&e),
    }
}

/// POST `/bills/{bill_id}/mark-paid` - Settle the remainder as an
/// administrative adjustment (opening-balance corrections).
async fn mark_paid(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
    payload: Option<Json<MarkPaidRequest>>,
) -> Response {
    let Json(payload) = payload.unwrap_or_default();
    let bill_id = BillId::from_uuid(bill_id);
    let billing_repo = BillingRepository::new((*state.db).clone());

    let bill = match billing_repo.get_bill(bill_id).await {
        Ok(bill) => bill,
        Err(e) => return billing_error(&e),
    };

    let ledger = match resolve_ledger_accounts(
        &state,
        bill.kind,
        payload.counterparty_account_code.as_deref(),
        payload.settlement_account_code.as_deref(),
    )
    .await
    {
        Ok(ledger) => ledger,
        Err(response) => return response,
    };

    match billing_repo.mark_paid_as_adjustment(bill_id, ledger).await {
        Ok(outcome) => {
            info!(
                bill_id = %bill_id,
                journal_entry_id = %outcome.journal_entry_id,
                "Bill marked paid by adjustment"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "bill": BillResponse::from(outcome.bill),
                    "journal_entry_id": outcome.journal_entry_id.into_inner(),
                })),
            )
                .into_response()
        }
        Err(e) => billing_error(&e),
    }
}

/// Resolves the control and settlement account codes to typed ids.
///
/// The defaults come from the standard chart: payables settle against
/// 2100, receivables against 1200, both through cash 1000 unless the
/// request names another ledger account.
async fn resolve_ledger_accounts(
    state: &AppState,
    kind: BillKind,
    counterparty_code: Option<&str>,
    settlement_code: Option<&str>,
) -> Result<PaymentLedgerAccounts, Response> {
    let default_control = match kind {
        BillKind::Payable => ACCOUNTS_PAYABLE_CODE,
        BillKind::Receivable => ACCOUNTS_RECEIVABLE_CODE,
    };
    let control_code = counterparty_code.unwrap_or(default_control);
    let settlement_code = settlement_code.unwrap_or(CASH_CODE);

    let account_repo = AccountRepository::new((*state.db).clone());
    let control = account_repo
        .find_by_code(control_code)
        .await
        .map_err(|e| ledger_lookup_error(control_code, &e))?;
    let settlement = account_repo
        .find_by_code(settlement_code)
        .await
        .map_err(|e| ledger_lookup_error(settlement_code, &e))?;

    Ok(PaymentLedgerAccounts {
        counterparty_control: control.id,
        settlement: settlement.id,
    })
}

fn ledger_lookup_error(code: &str, e: &ChartError) -> Response {
    if matches!(e, ChartError::NotFound(_)) {
        return error_response(
            422,
            "LEDGER_ACCOUNT_NOT_FOUND",
            &format!("No ledger account with code '{code}'"),
        );
    }
    error!(error = %e, "Ledger account lookup failed");
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}

fn billing_error(e: &BillingError) -> Response {
    if e.http_status_code() >= 500 {
        error!(error = %e, "Billing operation failed");
    }
    error_response(e.http_status_code(), e.error_code(), &e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use khata_shared::types::CounterpartyId;

    #[test]
    fn test_settled_bill_response() {
        let bill = Bill {
            id: khata_shared::types::BillId::new(),
            kind: BillKind::Payable,
            counterparty_id: CounterpartyId::new(),
            bill_number: "BILL-9".to_string(),
            issue_date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            due_date: chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            total_amount: Decimal::new(100_000, 2),
            paid_amount: Decimal::new(100_000, 2),
            status: BillStatus::Paid,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = BillResponse::from(bill);
        assert_eq!(response.status, "paid");
        assert_eq!(response.remaining_amount, "0.00");
    }
}
