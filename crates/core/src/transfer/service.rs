//! Fund transfer validation and planning.

use rust_decimal::Decimal;

use super::error::TransferError;
use super::types::{BankAccountRef, BankMovement, TransferPlan, TransferRequest, TxnDirection};

/// Fund transfer coordinator: validates a request and plans the paired
/// withdrawal/deposit.
pub struct TransferService;

impl TransferService {
    /// Validates a transfer request against both accounts and plans it.
    ///
    /// Negative resulting balances are permitted for every account kind:
    /// cash accounts may float negative transiently by policy, and the
    /// same policy applies to bank and UPI accounts.
    ///
    /// # Errors
    ///
    /// Returns `TransferError` if the request is invalid or either account
    /// is inactive.
    pub fn plan(
        request: &TransferRequest,
        from: &BankAccountRef,
        to: &BankAccountRef,
    ) -> Result<TransferPlan, TransferError> {
        if request.from_account_id == request.to_account_id {
            return Err(TransferError::SameAccount);
        }
        if request.amount <= Decimal::ZERO {
            return Err(TransferError::NonPositiveAmount);
        }
        if request.reference.trim().is_empty() {
            return Err(TransferError::MissingReference);
        }
        if !from.is_active {
            return Err(TransferError::InactiveAccount(from.id));
        }
        if !to.is_active {
            return Err(TransferError::InactiveAccount(to.id));
        }

        let withdrawal = BankMovement {
            bank_account_id: from.id,
            direction: TxnDirection::Withdrawal,
            amount: request.amount,
        };
        let deposit = BankMovement {
            bank_account_id: to.id,
            direction: TxnDirection::Deposit,
            amount: request.amount,
        };

        Ok(TransferPlan {
            withdrawal,
            deposit,
            reference: request.reference.clone(),
            date: request.date,
            description: request.description.clone(),
            from_balance_after: from.current_balance + withdrawal.direction.signed(request.amount),
            to_balance_after: to.current_balance + deposit.direction.signed(request.amount),
        })
    }

    /// Re-derives a cached balance from an opening balance plus the signed
    /// sum of the append-only transaction log.
    #[must_use]
    pub fn derive_balance<I>(opening_balance: Decimal, transactions: I) -> Decimal
    where
        I: IntoIterator<Item = (TxnDirection, Decimal)>,
    {
        transactions
            .into_iter()
            .fold(opening_balance, |acc, (direction, amount)| {
                acc + direction.signed(amount)
            })
    }
}
