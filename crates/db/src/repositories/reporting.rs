//! Reporting repository: balance derivation, roll-ups, drift checks, and
//! aging reports.
//!
//! The posted line log is the source of truth; cached balances are a
//! convenience that this module can verify but never silently corrects.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QuerySelect, RelationTrait,
};
use thiserror::Error;

use khata_core::aging::{AgingReport, aging_report};
use khata_core::balance::{
    AccountBalanceRow, BalanceCalculator, BalanceError, FinancialSummary, PostedLine, summarize,
};
use khata_core::billing::Bill;
use khata_core::chart::Account;
use khata_shared::types::AccountId;

use crate::entities::{accounts, bills, journal_entries, journal_lines, sea_orm_active_enums};

/// Errors surfaced by the reporting layer.
#[derive(Debug, Error)]
pub enum ReportingError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// A cached balance disagrees with the recomputed value.
    #[error(transparent)]
    Consistency(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ReportingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Consistency(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::AccountNotFound(_) => 404,
            Self::Consistency(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// A journal line with its owning entry's date and status, as fetched for
/// balance derivation.
#[derive(Debug, FromQueryResult)]
struct LineRow {
    debit: Decimal,
    credit: Decimal,
    entry_date: NaiveDate,
    status: sea_orm_active_enums::JournalStatus,
}

/// Reporting repository over the posted line log.
#[derive(Debug, Clone)]
pub struct ReportingRepository {
    db: DatabaseConnection,
}

impl ReportingRepository {
    /// Creates a new reporting repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes an account balance as of a date from the line log.
    ///
    /// Only lines of POSTED entries dated on or before `as_of` count.
    ///
    /// # Errors
    ///
    /// Returns `ReportingError::AccountNotFound` if the account is absent.
    pub async fn balance_as_of(
        &self,
        account_id: AccountId,
        as_of: NaiveDate,
    ) -> Result<Decimal, ReportingError> {
        let account = self.find_account(account_id).await?;
        let lines = self.posted_lines(account_id).await?;
        Ok(BalanceCalculator::balance_as_of(
            account.opening_balance,
            account.normal_balance(),
            lines,
            as_of,
        ))
    }

    /// Rolls all account balances up into summary financial metrics.
    ///
    /// With `as_of` given, balances are derived from the line log at that
    /// date; otherwise the cached balances are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn financial_summary(
        &self,
        as_of: Option<NaiveDate>,
    ) -> Result<FinancialSummary, ReportingError> {
        let account_rows = accounts::Entity::find().all(&self.db).await?;

        let mut rows = Vec::with_capacity(account_rows.len());
        for row in account_rows {
            let account = Account::from(row);
            let balance = match as_of {
                Some(date) => {
                    let lines = self.posted_lines(account.id).await?;
                    BalanceCalculator::balance_as_of(
                        account.opening_balance,
                        account.normal_balance(),
                        lines,
                        date,
                    )
                }
                None => account.current_balance,
            };
            rows.push(AccountBalanceRow {
                account_id: account.id,
                code: account.code,
                name: account.name,
                account_type: account.account_type,
                balance,
            });
        }

        Ok(summarize(rows))
    }

    /// Verifies an account's cached balance against the line log.
    ///
    /// A mismatch is logged for reconciliation and returned as a
    /// consistency error; the cache is never silently corrected.
    ///
    /// # Errors
    ///
    /// Returns `ReportingError::Consistency` on drift.
    pub async fn verify_cached_balance(
        &self,
        account_id: AccountId,
    ) -> Result<Decimal, ReportingError> {
        let account = self.find_account(account_id).await?;
        let lines = self.posted_lines(account_id).await?;
        let computed = BalanceCalculator::balance_as_of(
            account.opening_balance,
            account.normal_balance(),
            lines,
            NaiveDate::MAX,
        );

        if let Err(drift) =
            BalanceCalculator::verify_cached(account_id, account.current_balance, computed)
        {
            tracing::warn!(
                account_id = %account_id,
                cached = %account.current_balance,
                computed = %computed,
                "cached balance drift detected"
            );
            return Err(drift.into());
        }
        Ok(computed)
    }

    /// Builds the receivables/payables aging report as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn aging_report(&self, as_of: NaiveDate) -> Result<AgingReport, ReportingError> {
        let rows = bills::Entity::find().all(&self.db).await?;
        let bills: Vec<Bill> = rows.into_iter().map(Bill::from).collect();
        Ok(aging_report(&bills, as_of))
    }

    async fn find_account(&self, account_id: AccountId) -> Result<Account, ReportingError> {
        let row = accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ReportingError::AccountNotFound(account_id))?;
        Ok(row.into())
    }

    async fn posted_lines(&self, account_id: AccountId) -> Result<Vec<PostedLine>, ReportingError> {
        let rows: Vec<LineRow> = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
            .join(
                JoinType::InnerJoin,
                journal_lines::Relation::JournalEntries.def(),
            )
            .select_only()
            .column(journal_lines::Column::Debit)
            .column(journal_lines::Column::Credit)
            .column_as(journal_entries::Column::EntryDate, "entry_date")
            .column_as(journal_entries::Column::Status, "status")
            .into_model::<LineRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| PostedLine {
                entry_date: row.entry_date,
                status: row.status.into(),
                debit: row.debit,
                credit: row.credit,
            })
            .collect())
    }
}
