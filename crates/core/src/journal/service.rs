//! Journal service for entry validation and resolution.
//!
//! This module provides the core business logic for validating journal
//! entries before they are persisted. It contains no database dependencies;
//! the repository layer supplies account lookups as closures and performs
//! the atomic write.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use khata_shared::types::{AccountId, JournalEntryId};

use super::error::JournalError;
use super::types::{EntryTotals, LineInput, PostEntryInput, ResolvedLine};
use crate::chart::NormalBalance;

/// The account facts the journal needs to validate a posting.
#[derive(Debug, Clone, Copy)]
pub struct PostingAccount {
    /// The account ID.
    pub id: AccountId,
    /// Whether the account is active.
    pub is_active: bool,
    /// The account's normal balance side.
    pub normal_balance: NormalBalance,
}

/// Journal service for entry validation and resolution.
pub struct JournalService;

impl JournalService {
    /// Validate and resolve a journal entry before persisting.
    ///
    /// Performs every check before any write happens:
    /// 1. At least 2 lines
    /// 2. Per line: positive amount on exactly one side
    /// 3. Accounts resolve and are active
    /// 4. Sum of debits equals sum of credits, tolerance zero
    ///
    /// On success each line carries its signed balance effect, computed
    /// from the account's normal balance.
    ///
    /// # Errors
    ///
    /// Returns `JournalError` if any validation fails.
    pub fn validate_and_resolve<A>(
        input: &PostEntryInput,
        account_lookup: A,
    ) -> Result<(Vec<ResolvedLine>, EntryTotals), JournalError>
    where
        A: Fn(AccountId) -> Result<PostingAccount, JournalError>,
    {
        if input.lines.len() < 2 {
            return Err(JournalError::EmptyEntry);
        }

        let mut resolved = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            resolved.push(Self::resolve_line(line, &account_lookup)?);
        }

        let totals = Self::calculate_totals(&resolved);
        if !totals.is_balanced {
            return Err(JournalError::Unbalanced {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok((resolved, totals))
    }

    /// Resolve a single line against the chart of accounts.
    fn resolve_line<A>(line: &LineInput, account_lookup: &A) -> Result<ResolvedLine, JournalError>
    where
        A: Fn(AccountId) -> Result<PostingAccount, JournalError>,
    {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(JournalError::NegativeAmount);
        }
        if !line.debit.is_zero() && !line.credit.is_zero() {
            return Err(JournalError::BothSidesSet);
        }
        if line.debit.is_zero() && line.credit.is_zero() {
            return Err(JournalError::ZeroAmount);
        }

        let account = account_lookup(line.account_id)?;
        if !account.is_active {
            return Err(JournalError::AccountInactive(line.account_id));
        }

        Ok(ResolvedLine {
            account_id: line.account_id,
            debit: line.debit,
            credit: line.credit,
            balance_change: account.normal_balance.balance_change(line.debit, line.credit),
            memo: line.memo.clone(),
        })
    }

    /// Calculate entry totals from resolved lines.
    #[must_use]
    pub fn calculate_totals(lines: &[ResolvedLine]) -> EntryTotals {
        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        EntryTotals::new(total_debit, total_credit)
    }

    /// Builds the reversal of a posted entry.
    ///
    /// The reversal is a new balancing entry with debit/credit swapped on
    /// every line and a pointer back to the original; the original is never
    /// edited in place.
    #[must_use]
    pub fn build_reversal(
        original_id: JournalEntryId,
        original_description: &str,
        original_lines: &[LineInput],
        entry_date: NaiveDate,
        description: Option<String>,
    ) -> PostEntryInput {
        PostEntryInput {
            entry_date,
            description: description
                .unwrap_or_else(|| format!("Reversal of: {original_description}")),
            reference: None,
            reverses_entry_id: Some(original_id),
            lines: original_lines.iter().map(LineInput::swapped).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::LineInput;
    use rust_decimal_macros::dec;

    fn ok_lookup(id: AccountId) -> Result<PostingAccount, JournalError> {
        Ok(PostingAccount {
            id,
            is_active: true,
            normal_balance: NormalBalance::Debit,
        })
    }

    fn make_input(lines: Vec<LineInput>) -> PostEntryInput {
        PostEntryInput {
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            description: "Office rent".to_string(),
            reference: None,
            reverses_entry_id: None,
            lines,
        }
    }

    #[test]
    fn test_balanced_entry_resolves() {
        let input = make_input(vec![
            LineInput::debit(AccountId::new(), dec!(500)),
            LineInput::credit(AccountId::new(), dec!(500)),
        ]);

        let (resolved, totals) = JournalService::validate_and_resolve(&input, ok_lookup).unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(totals.is_balanced);
        assert_eq!(totals.total_debit, dec!(500));
        assert_eq!(totals.total_credit, dec!(500));
    }

    #[test]
    fn test_unbalanced_entry_rejected() {
        let input = make_input(vec![
            LineInput::debit(AccountId::new(), dec!(500)),
            LineInput::credit(AccountId::new(), dec!(499.99)),
        ]);

        assert!(matches!(
            JournalService::validate_and_resolve(&input, ok_lookup),
            Err(JournalError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_single_line_rejected() {
        let input = make_input(vec![LineInput::debit(AccountId::new(), dec!(500))]);
        assert!(matches!(
            JournalService::validate_and_resolve(&input, ok_lookup),
            Err(JournalError::EmptyEntry)
        ));
    }

    #[test]
    fn test_zero_line_rejected() {
        let mut line = LineInput::debit(AccountId::new(), Decimal::ZERO);
        line.credit = Decimal::ZERO;
        let input = make_input(vec![line, LineInput::credit(AccountId::new(), dec!(10))]);
        assert!(matches!(
            JournalService::validate_and_resolve(&input, ok_lookup),
            Err(JournalError::ZeroAmount)
        ));
    }

    #[test]
    fn test_negative_line_rejected() {
        let input = make_input(vec![
            LineInput::debit(AccountId::new(), dec!(-10)),
            LineInput::credit(AccountId::new(), dec!(-10)),
        ]);
        assert!(matches!(
            JournalService::validate_and_resolve(&input, ok_lookup),
            Err(JournalError::NegativeAmount)
        ));
    }

    #[test]
    fn test_both_sides_rejected() {
        let both = LineInput {
            account_id: AccountId::new(),
            debit: dec!(10),
            credit: dec!(10),
            memo: None,
        };
        let input = make_input(vec![both, LineInput::credit(AccountId::new(), dec!(10))]);
        assert!(matches!(
            JournalService::validate_and_resolve(&input, ok_lookup),
            Err(JournalError::BothSidesSet)
        ));
    }

    #[test]
    fn test_inactive_account_rejected() {
        let inactive_lookup = |id: AccountId| -> Result<PostingAccount, JournalError> {
            Ok(PostingAccount {
                id,
                is_active: false,
                normal_balance: NormalBalance::Debit,
            })
        };
        let input = make_input(vec![
            LineInput::debit(AccountId::new(), dec!(10)),
            LineInput::credit(AccountId::new(), dec!(10)),
        ]);
        assert!(matches!(
            JournalService::validate_and_resolve(&input, inactive_lookup),
            Err(JournalError::AccountInactive(_))
        ));
    }

    #[test]
    fn test_missing_account_rejected() {
        let missing_lookup =
            |id: AccountId| -> Result<PostingAccount, JournalError> { Err(JournalError::AccountNotFound(id)) };
        let input = make_input(vec![
            LineInput::debit(AccountId::new(), dec!(10)),
            LineInput::credit(AccountId::new(), dec!(10)),
        ]);
        assert!(matches!(
            JournalService::validate_and_resolve(&input, missing_lookup),
            Err(JournalError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_balance_change_signs() {
        // Debit-normal account debited, credit-normal account credited.
        let debit_acc = AccountId::new();
        let credit_acc = AccountId::new();
        let lookup = move |id: AccountId| -> Result<PostingAccount, JournalError> {
            Ok(PostingAccount {
                id,
                is_active: true,
                normal_balance: if id == debit_acc {
                    NormalBalance::Debit
                } else {
                    NormalBalance::Credit
                },
            })
        };
        let input = make_input(vec![
            LineInput::debit(debit_acc, dec!(500)),
            LineInput::credit(credit_acc, dec!(500)),
        ]);

        let (resolved, _) = JournalService::validate_and_resolve(&input, lookup).unwrap();
        // Both balances increase on their normal side.
        assert_eq!(resolved[0].balance_change, dec!(500));
        assert_eq!(resolved[1].balance_change, dec!(500));
    }

    #[test]
    fn test_build_reversal_swaps_sides() {
        let a = AccountId::new();
        let b = AccountId::new();
        let lines = vec![LineInput::debit(a, dec!(120)), LineInput::credit(b, dec!(120))];
        let original_id = JournalEntryId::new();

        let reversal = JournalService::build_reversal(
            original_id,
            "Office rent",
            &lines,
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            None,
        );

        assert_eq!(reversal.reverses_entry_id, Some(original_id));
        assert_eq!(reversal.lines[0].credit, dec!(120));
        assert_eq!(reversal.lines[0].debit, Decimal::ZERO);
        assert_eq!(reversal.lines[1].debit, dec!(120));
        assert!(reversal.description.contains("Office rent"));

        // The reversal itself still balances.
        let (_, totals) = JournalService::validate_and_resolve(&reversal, ok_lookup).unwrap();
        assert!(totals.is_balanced);
    }
}
