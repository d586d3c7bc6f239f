//! Fund transfer domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use khata_shared::types::BankAccountId;

/// Kind of money account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankAccountKind {
    /// A bank account.
    Bank,
    /// A UPI handle linked to a bank account.
    Upi,
    /// Physical cash.
    Cash,
}

/// Direction of a bank transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnDirection {
    /// Money in.
    Deposit,
    /// Money out.
    Withdrawal,
}

impl TxnDirection {
    /// Returns the signed effect of `amount` on a cached balance.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Deposit => amount,
            Self::Withdrawal => -amount,
        }
    }
}

/// The bank account facts the transfer coordinator needs.
#[derive(Debug, Clone, Copy)]
pub struct BankAccountRef {
    /// The account ID.
    pub id: BankAccountId,
    /// Account kind.
    pub kind: BankAccountKind,
    /// Whether the account is active.
    pub is_active: bool,
    /// Cached balance before the transfer.
    pub current_balance: Decimal,
}

/// A request to move funds between two accounts.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Source account.
    pub from_account_id: BankAccountId,
    /// Destination account.
    pub to_account_id: BankAccountId,
    /// Amount to move (must be positive).
    pub amount: Decimal,
    /// Business date of the transfer.
    pub date: NaiveDate,
    /// Human-readable description.
    pub description: String,
    /// Client-supplied reference; shared by both transactions and used as
    /// the idempotency key on retry.
    pub reference: String,
}

/// One planned side of a transfer or payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankMovement {
    /// The account the movement applies to.
    pub bank_account_id: BankAccountId,
    /// Deposit or withdrawal.
    pub direction: TxnDirection,
    /// Amount (positive).
    pub amount: Decimal,
}

/// A validated transfer: two movements sharing one reference.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    /// Withdrawal on the source account.
    pub withdrawal: BankMovement,
    /// Deposit on the destination account.
    pub deposit: BankMovement,
    /// Shared reference / idempotency key.
    pub reference: String,
    /// Business date.
    pub date: NaiveDate,
    /// Description for both transactions.
    pub description: String,
    /// Source balance after the transfer.
    pub from_balance_after: Decimal,
    /// Destination balance after the transfer.
    pub to_balance_after: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_amounts() {
        assert_eq!(TxnDirection::Deposit.signed(dec!(100)), dec!(100));
        assert_eq!(TxnDirection::Withdrawal.signed(dec!(100)), dec!(-100));
    }
}
