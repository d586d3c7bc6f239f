//! Integration tests for the fund transfer workflow.
//!
//! Drives the plan-then-commit protocol `TransferRepository::transfer`
//! runs: a replayed reference returns the recorded pair without new
//! writes, both movements land together or not at all, and money is
//! conserved across any sequence of transfers and retries.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use khata_core::transfer::{
        BankAccountKind, BankAccountRef, BankMovement, TransferError, TransferRequest,
        TransferService, TxnDirection,
    };
    use khata_shared::types::BankAccountId;

    // ========================================================================
    // In-Memory Unit of Work
    // ========================================================================

    /// In-memory stand-in for the transfer unit of work: account balances
    /// plus the append-only movement log, with the reference as the
    /// idempotency key.
    struct TransferLedger {
        accounts: HashMap<BankAccountId, BankAccountRef>,
        movements: Vec<(String, BankMovement)>,
    }

    impl TransferLedger {
        fn new(accounts: Vec<BankAccountRef>) -> Self {
            Self {
                accounts: accounts.into_iter().map(|a| (a.id, a)).collect(),
                movements: Vec::new(),
            }
        }

        /// Returns `true` when the reference replayed.
        fn transfer(&mut self, request: &TransferRequest) -> Result<bool, TransferError> {
            if self
                .movements
                .iter()
                .any(|(reference, _)| reference == &request.reference)
            {
                return Ok(true);
            }

            let from = *self
                .accounts
                .get(&request.from_account_id)
                .ok_or(TransferError::NotFound(request.from_account_id))?;
            let to = *self
                .accounts
                .get(&request.to_account_id)
                .ok_or(TransferError::NotFound(request.to_account_id))?;
            let plan = TransferService::plan(request, &from, &to)?;

            // Commit: both movements and both balance updates land together.
            for movement in [plan.withdrawal, plan.deposit] {
                let account = self
                    .accounts
                    .get_mut(&movement.bank_account_id)
                    .ok_or(TransferError::NotFound(movement.bank_account_id))?;
                account.current_balance += movement.direction.signed(movement.amount);
                self.movements.push((plan.reference.clone(), movement));
            }
            Ok(false)
        }

        fn balance(&self, id: BankAccountId) -> Decimal {
            self.accounts[&id].current_balance
        }

        fn total_money(&self) -> Decimal {
            self.accounts.values().map(|a| a.current_balance).sum()
        }
    }

    // ========================================================================
    // Helper Functions
    // ========================================================================

    fn account(balance: Decimal, is_active: bool) -> BankAccountRef {
        BankAccountRef {
            id: BankAccountId::new(),
            kind: BankAccountKind::Bank,
            is_active,
            current_balance: balance,
        }
    }

    fn request(
        from: BankAccountId,
        to: BankAccountId,
        amount: Decimal,
        reference: &str,
    ) -> TransferRequest {
        TransferRequest {
            from_account_id: from,
            to_account_id: to,
            amount,
            date: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            description: "Float top-up".to_string(),
            reference: reference.to_string(),
        }
    }

    // ========================================================================
    // Atomicity and Idempotent Retry
    // ========================================================================

    #[test]
    fn test_transfer_writes_paired_movements() {
        let from = account(dec!(1000), true);
        let to = account(dec!(200), true);
        let mut ledger = TransferLedger::new(vec![from, to]);

        let replayed = ledger
            .transfer(&request(from.id, to.id, dec!(300), "TRF-001"))
            .unwrap();
        assert!(!replayed);
        assert_eq!(ledger.balance(from.id), dec!(700));
        assert_eq!(ledger.balance(to.id), dec!(500));

        assert_eq!(ledger.movements.len(), 2);
        let (ref_w, withdrawal) = &ledger.movements[0];
        let (ref_d, deposit) = &ledger.movements[1];
        assert_eq!(ref_w, "TRF-001");
        assert_eq!(ref_d, "TRF-001");
        assert_eq!(withdrawal.direction, TxnDirection::Withdrawal);
        assert_eq!(deposit.direction, TxnDirection::Deposit);
        assert_eq!(withdrawal.amount, deposit.amount);
    }

    #[test]
    fn test_reference_replay_writes_nothing() {
        let from = account(dec!(1000), true);
        let to = account(dec!(200), true);
        let mut ledger = TransferLedger::new(vec![from, to]);
        let req = request(from.id, to.id, dec!(300), "TRF-001");

        ledger.transfer(&req).unwrap();
        let replayed = ledger.transfer(&req).unwrap();

        assert!(replayed);
        assert_eq!(ledger.balance(from.id), dec!(700));
        assert_eq!(ledger.balance(to.id), dec!(500));
        assert_eq!(ledger.movements.len(), 2);
    }

    #[test]
    fn test_failed_transfer_leaves_ledger_untouched() {
        let from = account(dec!(1000), true);
        let to = account(dec!(200), false);
        let mut ledger = TransferLedger::new(vec![from, to]);

        let result = ledger.transfer(&request(from.id, to.id, dec!(300), "TRF-001"));
        assert!(matches!(result, Err(TransferError::InactiveAccount(_))));
        assert_eq!(ledger.balance(from.id), dec!(1000));
        assert_eq!(ledger.balance(to.id), dec!(200));
        assert!(ledger.movements.is_empty());

        let unknown = BankAccountId::new();
        let result = ledger.transfer(&request(from.id, unknown, dec!(300), "TRF-002"));
        assert!(matches!(result, Err(TransferError::NotFound(id)) if id == unknown));
        assert_eq!(ledger.balance(from.id), dec!(1000));
        assert!(ledger.movements.is_empty());
    }

    // ========================================================================
    // Property Tests
    // ========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// *For any* sequence of transfers among three accounts, with
        /// references drawn from a small pool so retries occur, total money
        /// is conserved and every reference records at most one
        /// withdrawal/deposit pair whose signed effects cancel.
        #[test]
        fn prop_money_conserved_across_transfers_and_retries(
            ops in prop::collection::vec(
                (0usize..3usize, 0usize..3usize, 1i64..100_000i64, 0usize..5usize),
                1..25,
            ),
        ) {
            let accounts = vec![
                account(dec!(1000), true),
                account(dec!(0), true),
                account(dec!(-50), true),
            ];
            let ids: Vec<BankAccountId> = accounts.iter().map(|a| a.id).collect();
            let mut ledger = TransferLedger::new(accounts);
            let initial_total = ledger.total_money();

            for (from_idx, to_idx, cents, ref_idx) in ops {
                // Same-account requests and replays are expected along the way.
                let _ = ledger.transfer(&request(
                    ids[from_idx],
                    ids[to_idx],
                    Decimal::new(cents, 2),
                    &format!("TRF-{ref_idx}"),
                ));
            }

            prop_assert_eq!(ledger.total_money(), initial_total);

            for reference in ["TRF-0", "TRF-1", "TRF-2", "TRF-3", "TRF-4"] {
                let pair: Vec<&BankMovement> = ledger
                    .movements
                    .iter()
                    .filter(|(r, _)| r == reference)
                    .map(|(_, m)| m)
                    .collect();
                prop_assert!(pair.len() == 2 || pair.is_empty());
                let signed: Decimal = pair
                    .iter()
                    .map(|m| m.direction.signed(m.amount))
                    .sum();
                prop_assert_eq!(signed, Decimal::ZERO);
            }
        }
    }
}
