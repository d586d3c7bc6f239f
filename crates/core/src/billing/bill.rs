//! Bill and payment domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use khata_shared::types::{BankAccountId, BillId, CounterpartyId, PaymentId};

/// Whether a bill is money we owe or money owed to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillKind {
    /// Vendor bill: we owe the counterparty.
    Payable,
    /// Customer invoice: the counterparty owes us.
    Receivable,
}

/// Bill settlement status.
///
/// Transitions are strictly forward: pending → partially_paid → paid.
/// `Overdue` is derived from the due date on unpaid bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// No payment received yet.
    Pending,
    /// Some, but not all, of the total has been paid.
    PartiallyPaid,
    /// Fully settled.
    Paid,
    /// Past due date with an outstanding balance.
    Overdue,
}

impl BillStatus {
    /// Returns true if the bill can still accept payments.
    #[must_use]
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Paid)
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Bank transfer (NEFT/RTGS/IMPS).
    BankTransfer,
    /// UPI payment.
    Upi,
    /// Cheque.
    Cheque,
    /// Card payment.
    Card,
}

/// A vendor bill or customer invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier.
    pub id: BillId,
    /// Payable or receivable.
    pub kind: BillKind,
    /// The vendor or customer (owned by the CRM/procurement modules).
    pub counterparty_id: CounterpartyId,
    /// Document number (e.g., "INV-2026-0042").
    pub bill_number: String,
    /// Date the document was issued.
    pub issue_date: NaiveDate,
    /// Date payment falls due.
    pub due_date: NaiveDate,
    /// Total amount of the bill.
    pub total_amount: Decimal,
    /// Amount settled so far. Invariant: `0 <= paid_amount <= total_amount`.
    pub paid_amount: Decimal,
    /// Current settlement status.
    pub status: BillStatus,
    /// When the bill was created.
    pub created_at: DateTime<Utc>,
    /// When the bill was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// The outstanding balance: `total_amount - paid_amount`.
    #[must_use]
    pub fn remaining_amount(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }

    /// Returns true once the bill is fully settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.paid_amount == self.total_amount
    }

    /// The status as of `today`, deriving `Overdue` from the due date.
    ///
    /// Overdue is always derived at read time; the stored status is never
    /// the only truth for it.
    #[must_use]
    pub fn effective_status(&self, today: NaiveDate) -> BillStatus {
        if self.is_settled() {
            BillStatus::Paid
        } else if self.due_date < today {
            BillStatus::Overdue
        } else if self.paid_amount > Decimal::ZERO {
            BillStatus::PartiallyPaid
        } else {
            BillStatus::Pending
        }
    }
}

/// A settlement action against a bill. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// The bill this payment settles (part of).
    pub bill_id: BillId,
    /// Amount paid.
    pub amount: Decimal,
    /// Business date of the payment.
    pub payment_date: NaiveDate,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// The money account involved, when one is named.
    pub bank_account_id: Option<BankAccountId>,
    /// Client-supplied idempotency key.
    pub idempotency_key: String,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_bill(total: Decimal, paid: Decimal, due: NaiveDate) -> Bill {
        Bill {
            id: BillId::new(),
            kind: BillKind::Payable,
            counterparty_id: CounterpartyId::new(),
            bill_number: "BILL-1".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            due_date: due,
            total_amount: total,
            paid_amount: paid,
            status: BillStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_remaining_amount() {
        let bill = make_bill(dec!(1000), dec!(600), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(bill.remaining_amount(), dec!(400));
        assert!(!bill.is_settled());
    }

    #[test]
    fn test_effective_status_derivation() {
        let due = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let before_due = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        let after_due = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();

        let unpaid = make_bill(dec!(100), dec!(0), due);
        assert_eq!(unpaid.effective_status(before_due), BillStatus::Pending);
        assert_eq!(unpaid.effective_status(after_due), BillStatus::Overdue);

        let partial = make_bill(dec!(100), dec!(40), due);
        assert_eq!(partial.effective_status(before_due), BillStatus::PartiallyPaid);
        assert_eq!(partial.effective_status(after_due), BillStatus::Overdue);

        let paid = make_bill(dec!(100), dec!(100), due);
        assert_eq!(paid.effective_status(after_due), BillStatus::Paid);
    }

    #[test]
    fn test_paid_is_closed() {
        assert!(BillStatus::Pending.is_open());
        assert!(BillStatus::PartiallyPaid.is_open());
        assert!(BillStatus::Overdue.is_open());
        assert!(!BillStatus::Paid.is_open());
    }
}
