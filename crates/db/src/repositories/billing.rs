//! Billing repository for bills, payments, and adjustments.
//!
//! `record_payment` commits the bill mutation, the payment row, the
//! journal posting, and the optional bank movement in a single database
//! transaction. A payment row can never exist without its journal entry.

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use khata_core::billing::{
    Bill, BillKind, BillingError, BillingService, Payment, PaymentInput, PaymentLedgerAccounts,
    PaymentPlan,
};
use khata_core::journal::PostEntryInput;
use khata_core::transfer::BankMovement;
use khata_shared::types::{BillId, JournalEntryId, PaymentId};

use crate::entities::{bank_accounts, bank_transactions, bills, payments, sea_orm_active_enums};
use crate::repositories::journal::post_entry_txn;

/// Input for creating a bill.
#[derive(Debug, Clone)]
pub struct CreateBillInput {
    /// Payable or receivable.
    pub kind: BillKind,
    /// The counterparty (owned by the external CRM).
    pub counterparty_id: khata_shared::types::CounterpartyId,
    /// Document number.
    pub bill_number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Total amount (must be positive).
    pub total_amount: rust_decimal::Decimal,
}

/// The result of recording a payment.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// The bill after the payment applied.
    pub bill: Bill,
    /// The recorded payment.
    pub payment: Payment,
    /// The journal entry the payment posted.
    pub journal_entry_id: JournalEntryId,
    /// True when an idempotency-key replay returned the original result
    /// without writing anything.
    pub replayed: bool,
}

/// The result of an administrative adjustment.
#[derive(Debug, Clone)]
pub struct AdjustmentOutcome {
    /// The bill after settlement.
    pub bill: Bill,
    /// The adjustment journal entry.
    pub journal_entry_id: JournalEntryId,
}

/// Billing repository for bill and payment persistence.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
}

impl BillingRepository {
    /// Creates a new billing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a bill in `Pending` status with nothing paid.
    ///
    /// # Errors
    ///
    /// Returns `BillingError` on validation failure or database error.
    pub async fn create_bill(&self, input: CreateBillInput) -> Result<Bill, BillingError> {
        BillingService::validate_new_bill(
            &input.bill_number,
            input.total_amount,
            input.issue_date,
            input.due_date,
        )?;

        let now = chrono::Utc::now().into();
        let bill = bills::ActiveModel {
            id: Set(BillId::new().into_inner()),
            kind: Set(input.kind.into()),
            counterparty_id: Set(input.counterparty_id.into_inner()),
            bill_number: Set(input.bill_number),
            issue_date: Set(input.issue_date),
            due_date: Set(input.due_date),
            total_amount: Set(input.total_amount),
            paid_amount: Set(rust_decimal::Decimal::ZERO),
            status: Set(sea_orm_active_enums::BillStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let bill = bill.insert(&self.db).await.map_err(db_err)?;
        Ok(bill.into())
    }

    /// Gets a bill by ID.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::NotFound` if the bill does not exist.
    pub async fn get_bill(&self, id: BillId) -> Result<Bill, BillingError> {
        let row = bills::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(BillingError::NotFound(id))?;
        Ok(row.into())
    }

    /// Lists bills, optionally filtered by kind, newest due date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_bills(&self, kind: Option<BillKind>) -> Result<Vec<Bill>, BillingError> {
        let mut query = bills::Entity::find().order_by_desc(bills::Column::DueDate);
        if let Some(kind) = kind {
            let db_kind: sea_orm_active_enums::BillKind = kind.into();
            query = query.filter(bills::Column::Kind.eq(db_kind));
        }
        let rows = query.all(&self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Bill::from).collect())
    }

    /// Records a payment against a bill atomically.
    ///
    /// Replaying the same idempotency key against the same bill returns
    /// the already-recorded payment and performs no writes.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Overpayment` if the amount exceeds the
    /// remainder, `BillingError::NotFound` if the bill is absent,
    /// `BillingError::IdempotencyKeyReused` if the key was recorded
    /// against a different bill, and `BillingError::BankAccountNotFound`
    /// or `BillingError::InactiveBankAccount` when the named money
    /// account cannot take the movement.
    pub async fn record_payment(
        &self,
        bill_id: BillId,
        input: PaymentInput,
        ledger: PaymentLedgerAccounts,
    ) -> Result<PaymentOutcome, BillingError> {
        if let Some(existing) = payments::Entity::find()
            .filter(payments::Column::IdempotencyKey.eq(&input.idempotency_key))
            .one(&self.db)
            .await
            .map_err(db_err)?
        {
            // A key replayed against some other bill is a client bug, not a
            // retry; never hand back the other bill's outcome as success.
            if existing.bill_id != bill_id.into_inner() {
                return Err(BillingError::IdempotencyKeyReused);
            }
            let bill = self.get_bill(bill_id).await?;
            let journal_entry_id = JournalEntryId::from_uuid(existing.journal_entry_id);
            return Ok(PaymentOutcome {
                bill,
                payment: existing.into(),
                journal_entry_id,
                replayed: true,
            });
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        let bill_row = bills::Entity::find_by_id(bill_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(BillingError::NotFound(bill_id))?;
        let bill = Bill::from(bill_row.clone());

        let plan = BillingService::plan_payment(&bill, &input, &ledger)?;

        if let Some(movement) = &plan.bank_movement {
            lock_active_bank_account(&txn, movement.bank_account_id).await?;
        }

        let posted = post_entry_txn(
            &txn,
            &PostEntryInput {
                entry_date: input.date,
                description: format!("Payment against {}", bill.bill_number),
                reference: Some(bill.bill_number.clone()),
                reverses_entry_id: None,
                lines: plan.lines.clone(),
            },
        )
        .await?;
        let journal_entry_id = JournalEntryId::from_uuid(posted.entry.id);

        let updated_bill = apply_bill_plan(&txn, bill_row, &plan).await?;

        let now = chrono::Utc::now().into();
        let payment = payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            bill_id: Set(bill_id.into_inner()),
            amount: Set(plan.amount),
            payment_date: Set(input.date),
            method: Set(input.method.into()),
            bank_account_id: Set(input.bank_account_id.map(khata_shared::types::BankAccountId::into_inner)),
            journal_entry_id: Set(journal_entry_id.into_inner()),
            idempotency_key: Set(input.idempotency_key.clone()),
            created_at: Set(now),
        };
        let payment = payment.insert(&txn).await.map_err(db_err)?;

        if let Some(movement) = &plan.bank_movement {
            apply_bank_movement(
                &txn,
                movement,
                input.date,
                &format!("Payment against {}", bill.bill_number),
                &input.idempotency_key,
            )
            .await?;
        }

        txn.commit().await.map_err(db_err)?;

        Ok(PaymentOutcome {
            bill: updated_bill,
            payment: payment.into(),
            journal_entry_id,
            replayed: false,
        })
    }

    /// Settles a bill's remainder as an administrative adjustment.
    ///
    /// Used for opening-balance corrections. Posts an adjustment journal
    /// entry under the same atomicity rule as a payment but never touches
    /// a money account and records no payment row.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AlreadyPaid` if nothing remains outstanding.
    pub async fn mark_paid_as_adjustment(
        &self,
        bill_id: BillId,
        ledger: PaymentLedgerAccounts,
    ) -> Result<AdjustmentOutcome, BillingError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let bill_row = bills::Entity::find_by_id(bill_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(BillingError::NotFound(bill_id))?;
        let bill = Bill::from(bill_row.clone());

        let plan = BillingService::plan_adjustment(&bill, &ledger)?;

        let posted = post_entry_txn(
            &txn,
            &PostEntryInput {
                entry_date: chrono::Utc::now().date_naive(),
                description: format!("Adjustment: {} marked paid", bill.bill_number),
                reference: Some(bill.bill_number.clone()),
                reverses_entry_id: None,
                lines: plan.lines.clone(),
            },
        )
        .await?;

        let updated_bill = apply_bill_plan(&txn, bill_row, &plan).await?;

        txn.commit().await.map_err(db_err)?;

        Ok(AdjustmentOutcome {
            bill: updated_bill,
            journal_entry_id: JournalEntryId::from_uuid(posted.entry.id),
        })
    }
}

/// Applies the planned bill mutation inside the transaction.
async fn apply_bill_plan(
    txn: &DatabaseTransaction,
    bill_row: bills::Model,
    plan: &PaymentPlan,
) -> Result<Bill, BillingError> {
    let mut active: bills::ActiveModel = bill_row.into();
    active.paid_amount = Set(plan.new_paid_amount);
    active.status = Set(plan.new_status.into());
    active.updated_at = Set(chrono::Utc::now().into());
    let updated = active.update(txn).await.map_err(db_err)?;
    Ok(updated.into())
}

/// Locks the money account a payment moves through, rejecting the payment
/// before any write when the account is absent or inactive.
async fn lock_active_bank_account(
    txn: &DatabaseTransaction,
    id: khata_shared::types::BankAccountId,
) -> Result<bank_accounts::Model, BillingError> {
    let row = bank_accounts::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(BillingError::BankAccountNotFound(id))?;
    if !row.is_active {
        return Err(BillingError::InactiveBankAccount(id));
    }
    Ok(row)
}

/// Appends a bank transaction and bumps the cached balance, both inside
/// the caller's transaction.
async fn apply_bank_movement(
    txn: &DatabaseTransaction,
    movement: &BankMovement,
    date: NaiveDate,
    description: &str,
    reference: &str,
) -> Result<bank_transactions::Model, BillingError> {
    let now = chrono::Utc::now().into();
    let row = bank_transactions::ActiveModel {
        id: Set(khata_shared::types::BankTransactionId::new().into_inner()),
        bank_account_id: Set(movement.bank_account_id.into_inner()),
        direction: Set(movement.direction.into()),
        amount: Set(movement.amount),
        date: Set(date),
        description: Set(description.to_string()),
        reference: Set(reference.to_string()),
        created_at: Set(now),
    };
    let row = row.insert(txn).await.map_err(db_err)?;

    bank_accounts::Entity::update_many()
        .col_expr(
            bank_accounts::Column::CurrentBalance,
            Expr::col(bank_accounts::Column::CurrentBalance)
                .add(movement.direction.signed(movement.amount)),
        )
        .col_expr(bank_accounts::Column::UpdatedAt, Expr::value(now))
        .filter(bank_accounts::Column::Id.eq(movement.bank_account_id.into_inner()))
        .exec(txn)
        .await
        .map_err(db_err)?;

    Ok(row)
}

fn db_err(err: DbErr) -> BillingError {
    BillingError::Database(err.to_string())
}
