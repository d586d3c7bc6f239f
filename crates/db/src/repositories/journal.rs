//! Journal repository for posting, reversing, and reading entries.
//!
//! All validation happens in `khata-core` before any write; the entry,
//! its lines, and the cached balance updates land in one database
//! transaction.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use khata_core::journal::{
    JournalError, JournalService, LineInput, PostEntryInput, PostingAccount, journal_number,
};
use khata_core::chart::AccountType;
use khata_shared::principal::SYSTEM_PRINCIPAL_ID;
use khata_shared::types::{AccountId, JournalEntryId, JournalLineId};

use crate::entities::{accounts, journal_entries, journal_lines, sea_orm_active_enums};

/// A posted entry with its lines.
#[derive(Debug, Clone)]
pub struct PostedEntry {
    /// The entry header.
    pub entry: journal_entries::Model,
    /// The entry's lines.
    pub lines: Vec<journal_lines::Model>,
}

/// Journal repository for entry persistence.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and posts a journal entry atomically.
    ///
    /// # Errors
    ///
    /// Returns `JournalError` if validation fails or the write cannot be
    /// committed; on failure nothing is persisted.
    pub async fn post_entry(&self, input: &PostEntryInput) -> Result<PostedEntry, JournalError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let posted = post_entry_txn(&txn, input).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(posted)
    }

    /// Reverses a posted entry with a new compensating entry.
    ///
    /// The original entry is never edited; the reversal carries swapped
    /// debit/credit lines and points back via `reverses_entry_id`.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::NotFound` if the entry is absent and
    /// `JournalError::NotPosted` if it is still a draft.
    pub async fn reverse_entry(
        &self,
        id: JournalEntryId,
        entry_date: NaiveDate,
        description: Option<String>,
    ) -> Result<PostedEntry, JournalError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let original = journal_entries::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(JournalError::NotFound(id))?;
        if original.status != sea_orm_active_enums::JournalStatus::Posted {
            return Err(JournalError::NotPosted);
        }

        let original_lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.eq(id.into_inner()))
            .all(&txn)
            .await
            .map_err(db_err)?;
        let line_inputs: Vec<LineInput> = original_lines
            .iter()
            .map(|l| LineInput {
                account_id: AccountId::from_uuid(l.account_id),
                debit: l.debit,
                credit: l.credit,
                memo: l.memo.clone(),
            })
            .collect();

        let reversal = JournalService::build_reversal(
            id,
            &original.description,
            &line_inputs,
            entry_date,
            description,
        );
        let posted = post_entry_txn(&txn, &reversal).await?;

        txn.commit().await.map_err(db_err)?;
        Ok(posted)
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::NotFound` if the entry does not exist.
    pub async fn get_entry(&self, id: JournalEntryId) -> Result<PostedEntry, JournalError> {
        let entry = journal_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(JournalError::NotFound(id))?;
        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.eq(id.into_inner()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(PostedEntry { entry, lines })
    }

    /// Lists entries, newest business date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(&self) -> Result<Vec<journal_entries::Model>, JournalError> {
        journal_entries::Entity::find()
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

/// Posts an entry inside an existing transaction.
///
/// Used directly by the billing repository so that a payment's bill
/// mutation and journal posting share one commit.
///
/// # Errors
///
/// Returns `JournalError` if validation fails or a write fails.
pub(crate) async fn post_entry_txn(
    txn: &DatabaseTransaction,
    input: &PostEntryInput,
) -> Result<PostedEntry, JournalError> {
    // Lock the affected account rows up front so concurrent posts to the
    // same accounts serialize.
    let account_ids: Vec<Uuid> = input
        .lines
        .iter()
        .map(|l| l.account_id.into_inner())
        .collect();
    let account_rows = accounts::Entity::find()
        .filter(accounts::Column::Id.is_in(account_ids))
        .lock_exclusive()
        .all(txn)
        .await
        .map_err(db_err)?;

    let posting_accounts: HashMap<AccountId, PostingAccount> = account_rows
        .iter()
        .map(|a| {
            let id = AccountId::from_uuid(a.id);
            let account_type: AccountType = a.account_type.into();
            (
                id,
                PostingAccount {
                    id,
                    is_active: a.is_active,
                    normal_balance: account_type.normal_balance(),
                },
            )
        })
        .collect();

    let (resolved, totals) = JournalService::validate_and_resolve(input, |id| {
        posting_accounts
            .get(&id)
            .copied()
            .ok_or(JournalError::AccountNotFound(id))
    })?;

    // Allocated inside the transaction; the unique index on journal_number
    // backstops concurrent allocation.
    let year = input.entry_date.year();
    let existing = journal_entries::Entity::find()
        .filter(journal_entries::Column::JournalNumber.starts_with(format!("JRNL-{year}-")))
        .count(txn)
        .await
        .map_err(db_err)?;
    let sequence = i64::try_from(existing)
        .map_err(|_| JournalError::Database("journal sequence overflow".into()))?
        + 1;

    let now = chrono::Utc::now().into();
    let entry = journal_entries::ActiveModel {
        id: Set(JournalEntryId::new().into_inner()),
        journal_number: Set(journal_number(year, sequence)),
        entry_date: Set(input.entry_date),
        description: Set(input.description.clone()),
        reference: Set(input.reference.clone()),
        status: Set(sea_orm_active_enums::JournalStatus::Posted),
        total_debit: Set(totals.total_debit),
        total_credit: Set(totals.total_credit),
        reverses_entry_id: Set(input.reverses_entry_id.map(JournalEntryId::into_inner)),
        created_by: Set(SYSTEM_PRINCIPAL_ID),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let entry = entry.insert(txn).await.map_err(db_err)?;

    let mut lines = Vec::with_capacity(resolved.len());
    for line in &resolved {
        let model = journal_lines::ActiveModel {
            id: Set(JournalLineId::new().into_inner()),
            journal_entry_id: Set(entry.id),
            account_id: Set(line.account_id.into_inner()),
            debit: Set(line.debit),
            credit: Set(line.credit),
            balance_change: Set(line.balance_change),
            memo: Set(line.memo.clone()),
            created_at: Set(now),
        };
        lines.push(model.insert(txn).await.map_err(db_err)?);
    }

    // One balance update per account, still inside the same transaction.
    let mut deltas: HashMap<Uuid, Decimal> = HashMap::new();
    for line in &resolved {
        *deltas.entry(line.account_id.into_inner()).or_default() += line.balance_change;
    }
    for (account_id, delta) in deltas {
        accounts::Entity::update_many()
            .col_expr(
                accounts::Column::CurrentBalance,
                Expr::col(accounts::Column::CurrentBalance).add(delta),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
            .filter(accounts::Column::Id.eq(account_id))
            .exec(txn)
            .await
            .map_err(db_err)?;
    }

    Ok(PostedEntry { entry, lines })
}

fn db_err(err: DbErr) -> JournalError {
    JournalError::Database(err.to_string())
}
