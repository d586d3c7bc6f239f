//! Transfer repository for bank accounts and fund movements.
//!
//! A transfer writes exactly two bank transactions (one withdrawal, one
//! deposit) sharing a reference, plus both cached balance updates, in a
//! single database transaction. The reference doubles as the idempotency
//! key: replaying it returns the recorded transfer without new writes.

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use khata_core::transfer::{
    BankAccountKind, BankMovement, TransferError, TransferRequest, TransferService,
};
use khata_shared::AppError;
use khata_shared::types::{BankAccountId, BankTransactionId};

use crate::entities::{bank_accounts, bank_transactions, sea_orm_active_enums};

/// Input for creating a money account.
#[derive(Debug, Clone)]
pub struct CreateBankAccountInput {
    /// Display name.
    pub name: String,
    /// Bank, UPI, or cash.
    pub kind: BankAccountKind,
    /// Account number or UPI handle, if any.
    pub account_number: Option<String>,
    /// The bank account a UPI handle draws on.
    pub linked_account_id: Option<BankAccountId>,
    /// Balance carried in at setup.
    pub opening_balance: Decimal,
}

/// The result of a fund transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The withdrawal on the source account.
    pub withdrawal: bank_transactions::Model,
    /// The deposit on the destination account.
    pub deposit: bank_transactions::Model,
    /// Source balance after the transfer.
    pub from_balance_after: Decimal,
    /// Destination balance after the transfer.
    pub to_balance_after: Decimal,
    /// True when a reference replay returned the recorded transfer.
    pub replayed: bool,
}

/// Transfer repository for money account persistence.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a money account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a non-UPI account names a linked
    /// account or the linked account is not a bank account.
    pub async fn create_bank_account(
        &self,
        input: CreateBankAccountInput,
    ) -> Result<bank_accounts::Model, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation("account name is required".into()));
        }
        if let Some(linked_id) = input.linked_account_id {
            if input.kind != BankAccountKind::Upi {
                return Err(AppError::Validation(
                    "only UPI accounts link to a bank account".into(),
                ));
            }
            let linked = bank_accounts::Entity::find_by_id(linked_id.into_inner())
                .one(&self.db)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .ok_or_else(|| AppError::NotFound(format!("bank account {linked_id}")))?;
            if linked.kind != sea_orm_active_enums::BankAccountKind::Bank {
                return Err(AppError::Validation(
                    "a UPI handle must link to a bank account".into(),
                ));
            }
        }

        let now = chrono::Utc::now().into();
        let account = bank_accounts::ActiveModel {
            id: Set(BankAccountId::new().into_inner()),
            name: Set(input.name),
            kind: Set(input.kind.into()),
            account_number: Set(input.account_number),
            linked_account_id: Set(input.linked_account_id.map(BankAccountId::into_inner)),
            opening_balance: Set(input.opening_balance),
            current_balance: Set(input.opening_balance),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        account
            .insert(&self.db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Lists money accounts ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_bank_accounts(&self) -> Result<Vec<bank_accounts::Model>, AppError> {
        bank_accounts::Entity::find()
            .order_by_asc(bank_accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Finds a money account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the account does not exist.
    pub async fn find_bank_account(
        &self,
        id: BankAccountId,
    ) -> Result<bank_accounts::Model, AppError> {
        bank_accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("bank account {id}")))
    }

    /// Moves funds between two money accounts atomically.
    ///
    /// # Errors
    ///
    /// Returns `TransferError` if validation fails or either account is
    /// missing; on failure nothing is persisted.
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferOutcome, TransferError> {
        if let Some(outcome) = self.find_recorded_transfer(&request).await? {
            return Ok(outcome);
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        // Lock both rows in a stable order so concurrent opposite-direction
        // transfers between the same pair cannot deadlock.
        let (first_id, second_id) = lock_order(request.from_account_id, request.to_account_id);
        let first = find_locked(&txn, first_id).await?;
        let second = find_locked(&txn, second_id).await?;
        let (from_row, to_row) = if first_id == request.from_account_id {
            (first, second)
        } else {
            (second, first)
        };

        let plan = TransferService::plan(
            &request,
            &from_row.as_ref_for_transfer(),
            &to_row.as_ref_for_transfer(),
        )?;

        let withdrawal =
            apply_movement(&txn, &plan.withdrawal, &request, &plan.reference).await?;
        let deposit = apply_movement(&txn, &plan.deposit, &request, &plan.reference).await?;

        txn.commit().await.map_err(db_err)?;

        Ok(TransferOutcome {
            withdrawal,
            deposit,
            from_balance_after: plan.from_balance_after,
            to_balance_after: plan.to_balance_after,
            replayed: false,
        })
    }

    /// Looks up an already-recorded transfer by its reference.
    async fn find_recorded_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<Option<TransferOutcome>, TransferError> {
        let recorded = bank_transactions::Entity::find()
            .filter(bank_transactions::Column::Reference.eq(&request.reference))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if recorded.is_empty() {
            return Ok(None);
        }

        let withdrawal = recorded
            .iter()
            .find(|t| t.direction == sea_orm_active_enums::BankTxnDirection::Withdrawal)
            .cloned();
        let deposit = recorded
            .iter()
            .find(|t| t.direction == sea_orm_active_enums::BankTxnDirection::Deposit)
            .cloned();
        let (Some(withdrawal), Some(deposit)) = (withdrawal, deposit) else {
            // The reference belongs to a payment movement, not a transfer
            // pair; treat it as a fresh reference and let the unique index
            // arbitrate.
            return Ok(None);
        };

        let from = self
            .balance_of(BankAccountId::from_uuid(withdrawal.bank_account_id))
            .await?;
        let to = self
            .balance_of(BankAccountId::from_uuid(deposit.bank_account_id))
            .await?;

        Ok(Some(TransferOutcome {
            withdrawal,
            deposit,
            from_balance_after: from,
            to_balance_after: to,
            replayed: true,
        }))
    }

    async fn balance_of(&self, id: BankAccountId) -> Result<Decimal, TransferError> {
        let row = bank_accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(TransferError::NotFound(id))?;
        Ok(row.current_balance)
    }
}

/// Orders two account ids by their UUID bytes for row locking.
fn lock_order(a: BankAccountId, b: BankAccountId) -> (BankAccountId, BankAccountId) {
    if a.into_inner() <= b.into_inner() {
        (a, b)
    } else {
        (b, a)
    }
}

async fn find_locked(
    txn: &DatabaseTransaction,
    id: BankAccountId,
) -> Result<bank_accounts::Model, TransferError> {
    bank_accounts::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(TransferError::NotFound(id))
}

/// Appends one side of the transfer and bumps the cached balance.
async fn apply_movement(
    txn: &DatabaseTransaction,
    movement: &BankMovement,
    request: &TransferRequest,
    reference: &str,
) -> Result<bank_transactions::Model, TransferError> {
    let now = chrono::Utc::now().into();
    let row = bank_transactions::ActiveModel {
        id: Set(BankTransactionId::new().into_inner()),
        bank_account_id: Set(movement.bank_account_id.into_inner()),
        direction: Set(movement.direction.into()),
        amount: Set(movement.amount),
        date: Set(request.date),
        description: Set(request.description.clone()),
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

fn db_err(err: DbErr) -> TransferError {
    TransferError::Database(err.to_string())
}
