//! Balance derivation from the posted line log.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use khata_shared::types::AccountId;

use crate::chart::NormalBalance;
use crate::journal::JournalStatus;

/// A journal line as seen by the balance calculator.
#[derive(Debug, Clone, Copy)]
pub struct PostedLine {
    /// The business date of the owning entry.
    pub entry_date: NaiveDate,
    /// Status of the owning entry.
    pub status: JournalStatus,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Errors surfaced by balance verification.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// The cached balance disagrees with the value recomputed from the log.
    ///
    /// Never silently corrected; callers log it for reconciliation.
    #[error("Cached balance for account {account_id} is {cached}, recomputed {computed}")]
    Drift {
        /// The account whose cache drifted.
        account_id: AccountId,
        /// The cached value.
        cached: Decimal,
        /// The value recomputed from the line log.
        computed: Decimal,
    },
}

impl BalanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Drift { .. } => "CONSISTENCY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Drift { .. } => 500,
        }
    }
}

/// Balance calculator over the append-only line log.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Computes an account balance as of a date.
    ///
    /// `opening_balance + Σ signed effects` of lines dated on or before
    /// `as_of` that belong to POSTED entries. Draft entries never affect
    /// balances.
    #[must_use]
    pub fn balance_as_of<I>(
        opening_balance: Decimal,
        normal_balance: NormalBalance,
        lines: I,
        as_of: NaiveDate,
    ) -> Decimal
    where
        I: IntoIterator<Item = PostedLine>,
    {
        lines
            .into_iter()
            .filter(|l| l.status.is_posted() && l.entry_date <= as_of)
            .fold(opening_balance, |acc, l| {
                acc + normal_balance.balance_change(l.debit, l.credit)
            })
    }

    /// Verifies a cached balance against the recomputed value.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::Drift` when they disagree. The caller is
    /// expected to log the drift for reconciliation, not correct it.
    pub fn verify_cached(
        account_id: AccountId,
        cached: Decimal,
        computed: Decimal,
    ) -> Result<(), BalanceError> {
        if cached == computed {
            Ok(())
        } else {
            Err(BalanceError::Drift {
                account_id,
                cached,
                computed,
            })
        }
    }
}
