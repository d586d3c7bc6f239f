//! Property tests for journal validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use khata_shared::types::AccountId;

use super::error::JournalError;
use super::service::{JournalService, PostingAccount};
use super::types::{LineInput, PostEntryInput};
use crate::chart::NormalBalance;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    // Positive two-decimal amounts up to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn debit_lookup(id: AccountId) -> Result<PostingAccount, JournalError> {
    Ok(PostingAccount {
        id,
        is_active: true,
        normal_balance: NormalBalance::Debit,
    })
}

fn make_input(lines: Vec<LineInput>) -> PostEntryInput {
    PostEntryInput {
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        description: "prop".to_string(),
        reference: None,
        reverses_entry_id: None,
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any entry built as N debit amounts mirrored by one credit of their
    /// sum resolves, and its totals match exactly.
    #[test]
    fn prop_mirrored_entries_balance(amounts in prop::collection::vec(amount_strategy(), 1..8)) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<LineInput> = amounts
            .iter()
            .map(|a| LineInput::debit(AccountId::new(), *a))
            .collect();
        lines.push(LineInput::credit(AccountId::new(), total));

        let (resolved, totals) =
            JournalService::validate_and_resolve(&make_input(lines), debit_lookup).unwrap();

        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.total_debit, total);
        prop_assert_eq!(totals.total_credit, total);
        prop_assert_eq!(resolved.len(), amounts.len() + 1);
    }

    /// With every account debit-normal, the signed balance effects of a
    /// balanced entry sum to zero: what one account gains another loses.
    #[test]
    fn prop_signed_effects_cancel(amounts in prop::collection::vec(amount_strategy(), 1..8)) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<LineInput> = amounts
            .iter()
            .map(|a| LineInput::debit(AccountId::new(), *a))
            .collect();
        lines.push(LineInput::credit(AccountId::new(), total));

        let (resolved, _) =
            JournalService::validate_and_resolve(&make_input(lines), debit_lookup).unwrap();

        let net: Decimal = resolved.iter().map(|l| l.balance_change).sum();
        prop_assert_eq!(net, Decimal::ZERO);
    }

    /// Perturbing the credit side of a balanced entry always gets rejected.
    #[test]
    fn prop_unbalanced_always_rejected(
        amount in amount_strategy(),
        skew in 1i64..1_000_000i64,
    ) {
        let lines = vec![
            LineInput::debit(AccountId::new(), amount),
            LineInput::credit(AccountId::new(), amount + Decimal::new(skew, 2)),
        ];

        let result = JournalService::validate_and_resolve(&make_input(lines), debit_lookup);
        prop_assert!(
            matches!(result, Err(JournalError::Unbalanced { .. })),
            "expected unbalanced rejection"
        );
    }

    /// A reversal of any balanced entry is itself balanced with the same totals.
    #[test]
    fn prop_reversal_balances(amounts in prop::collection::vec(amount_strategy(), 1..8)) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<LineInput> = amounts
            .iter()
            .map(|a| LineInput::debit(AccountId::new(), *a))
            .collect();
        lines.push(LineInput::credit(AccountId::new(), total));

        let reversal = JournalService::build_reversal(
            khata_shared::types::JournalEntryId::new(),
            "prop",
            &lines,
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            None,
        );

        let (_, totals) =
            JournalService::validate_and_resolve(&reversal, debit_lookup).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.total_debit, total);
    }
}
