//! Journal domain types for entry creation and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use khata_shared::types::{AccountId, JournalEntryId};

/// Journal entry status.
///
/// Only POSTED entries affect balances; DRAFT entries are invisible to the
/// balance calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Entry is being drafted and does not affect balances.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
}

impl JournalStatus {
    /// Returns true if the entry affects balances.
    #[must_use]
    pub fn is_posted(self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// Input for a single journal line.
///
/// Exactly one of `debit`/`credit` must be nonzero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Optional memo for this line.
    pub memo: Option<String>,
}

impl LineInput {
    /// Convenience constructor for a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            memo: None,
        }
    }

    /// Convenience constructor for a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            memo: None,
        }
    }

    /// Returns the same line with debit and credit swapped.
    ///
    /// Used to build reversal entries.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
            memo: self.memo.clone(),
        }
    }
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone)]
pub struct PostEntryInput {
    /// The business date of the entry.
    pub entry_date: NaiveDate,
    /// A description of the entry.
    pub description: String,
    /// Optional reference (bill number, transfer reference, ...).
    pub reference: Option<String>,
    /// If this entry reverses another, the original entry.
    pub reverses_entry_id: Option<JournalEntryId>,
    /// The journal lines (must have at least 2).
    pub lines: Vec<LineInput>,
}

/// A validated line with its signed balance effect resolved.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Signed effect on the account's cached balance, per its normal balance.
    pub balance_change: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Entry totals for balance validation and display.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Sum of all debit amounts.
    pub total_debit: Decimal,
    /// Sum of all credit amounts.
    pub total_credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Formats a journal number: `JRNL-<year>-<zero-padded sequence>`.
#[must_use]
pub fn journal_number(year: i32, sequence: i64) -> String {
    format!("JRNL-{year}-{sequence:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_totals_balanced() {
        let totals = EntryTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_entry_totals_unbalanced() {
        let totals = EntryTotals::new(dec!(100.00), dec!(50.00));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(50.00));
    }

    #[test]
    fn test_line_swapped() {
        let line = LineInput::debit(AccountId::new(), dec!(75));
        let swapped = line.swapped();
        assert_eq!(swapped.debit, Decimal::ZERO);
        assert_eq!(swapped.credit, dec!(75));
        assert_eq!(swapped.account_id, line.account_id);
    }

    #[test]
    fn test_journal_number_format() {
        assert_eq!(journal_number(2026, 42), "JRNL-2026-000042");
        assert_eq!(journal_number(2026, 1_234_567), "JRNL-2026-1234567");
    }

    #[test]
    fn test_draft_is_not_posted() {
        assert!(!JournalStatus::Draft.is_posted());
        assert!(JournalStatus::Posted.is_posted());
    }
}
