//! Payment settlement planning.
//!
//! All validation happens here before any write. The result is a
//! `PaymentPlan` bundling the bill mutation, the journal lines, and the
//! optional bank movement; the repository commits the whole plan in one
//! database transaction so a payment row can never exist without its
//! journal posting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use khata_shared::types::{AccountId, BankAccountId};

use super::bill::{Bill, BillKind, BillStatus, PaymentMethod};
use super::error::BillingError;
use crate::journal::types::LineInput;
use crate::transfer::{BankMovement, TxnDirection};

/// Input for recording a payment against a bill.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    /// Amount to pay.
    pub amount: Decimal,
    /// Business date of the payment.
    pub date: NaiveDate,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// Money account to move funds through, if any.
    pub bank_account_id: Option<BankAccountId>,
    /// Client-supplied idempotency key.
    pub idempotency_key: String,
}

/// The ledger accounts a payment posts against.
///
/// Resolved once by the repository from the chart of accounts and passed
/// by typed id; handlers never pass raw account codes around.
#[derive(Debug, Clone, Copy)]
pub struct PaymentLedgerAccounts {
    /// The counterparty control account (accounts payable or receivable).
    pub counterparty_control: AccountId,
    /// The cash/bank ledger account money moves through.
    pub settlement: AccountId,
}

/// A fully validated payment, ready to be committed atomically.
#[derive(Debug, Clone)]
pub struct PaymentPlan {
    /// The amount being applied.
    pub amount: Decimal,
    /// The bill's paid_amount after this payment.
    pub new_paid_amount: Decimal,
    /// The bill's status after this payment.
    pub new_status: BillStatus,
    /// The balanced journal lines for the cash movement.
    pub lines: Vec<LineInput>,
    /// Bank transaction to append, when a money account was named.
    pub bank_movement: Option<BankMovement>,
}

/// Billing service for bill and payment validation.
pub struct BillingService;

impl BillingService {
    /// Validates a new bill before creation.
    ///
    /// # Errors
    ///
    /// Returns `BillingError` on a non-positive total, an empty bill
    /// number, or a due date before the issue date.
    pub fn validate_new_bill(
        bill_number: &str,
        total_amount: Decimal,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<(), BillingError> {
        if bill_number.trim().is_empty() {
            return Err(BillingError::Validation("bill number is required".into()));
        }
        if total_amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveTotal);
        }
        if due_date < issue_date {
            return Err(BillingError::Validation(
                "due date cannot precede issue date".into(),
            ));
        }
        Ok(())
    }

    /// Validates a payment and plans its atomic application.
    ///
    /// Checks, in order: idempotency key present, amount positive, bill
    /// still open, and no overpayment (`amount <= remaining`). A rejected
    /// payment leaves the bill untouched.
    ///
    /// # Errors
    ///
    /// Returns `BillingError` if any validation fails.
    pub fn plan_payment(
        bill: &Bill,
        input: &PaymentInput,
        accounts: &PaymentLedgerAccounts,
    ) -> Result<PaymentPlan, BillingError> {
        if input.idempotency_key.trim().is_empty() {
            return Err(BillingError::MissingIdempotencyKey);
        }
        if input.amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveAmount);
        }
        if !bill.status.is_open() || bill.is_settled() {
            return Err(BillingError::AlreadyPaid(bill.id));
        }
        let remaining = bill.remaining_amount();
        if input.amount > remaining {
            return Err(BillingError::Overpayment {
                amount: input.amount,
                remaining,
            });
        }

        let new_paid_amount = bill.paid_amount + input.amount;
        let new_status = if new_paid_amount == bill.total_amount {
            BillStatus::Paid
        } else {
            BillStatus::PartiallyPaid
        };

        Ok(PaymentPlan {
            amount: input.amount,
            new_paid_amount,
            new_status,
            lines: Self::settlement_lines(bill.kind, input.amount, accounts),
            bank_movement: input.bank_account_id.map(|bank_account_id| BankMovement {
                bank_account_id,
                direction: Self::movement_direction(bill.kind),
                amount: input.amount,
            }),
        })
    }

    /// Plans settling the full remainder as an administrative adjustment.
    ///
    /// Used for opening-balance corrections; follows the same atomicity
    /// rule as a regular payment but never touches a money account.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::AlreadyPaid` if nothing remains outstanding.
    pub fn plan_adjustment(
        bill: &Bill,
        accounts: &PaymentLedgerAccounts,
    ) -> Result<PaymentPlan, BillingError> {
        let remaining = bill.remaining_amount();
        if remaining <= Decimal::ZERO {
            return Err(BillingError::AlreadyPaid(bill.id));
        }

        Ok(PaymentPlan {
            amount: remaining,
            new_paid_amount: bill.total_amount,
            new_status: BillStatus::Paid,
            lines: Self::settlement_lines(bill.kind, remaining, accounts),
            bank_movement: None,
        })
    }

    /// Builds the balanced journal lines for a settlement.
    ///
    /// Payable: debit the liability control (reduce what we owe), credit
    /// cash/bank. Receivable: debit cash/bank, credit the receivable
    /// control (reduce what is owed to us).
    fn settlement_lines(
        kind: BillKind,
        amount: Decimal,
        accounts: &PaymentLedgerAccounts,
    ) -> Vec<LineInput> {
        match kind {
            BillKind::Payable => vec![
                LineInput::debit(accounts.counterparty_control, amount),
                LineInput::credit(accounts.settlement, amount),
            ],
            BillKind::Receivable => vec![
                LineInput::debit(accounts.settlement, amount),
                LineInput::credit(accounts.counterparty_control, amount),
            ],
        }
    }

    /// Paying a vendor withdraws money; collecting a receivable deposits it.
    const fn movement_direction(kind: BillKind) -> TxnDirection {
        match kind {
            BillKind::Payable => TxnDirection::Withdrawal,
            BillKind::Receivable => TxnDirection::Deposit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use khata_shared::types::{BillId, CounterpartyId};

    fn make_bill(kind: BillKind, total: Decimal, paid: Decimal) -> Bill {
        Bill {
            id: BillId::new(),
            kind,
            counterparty_id: CounterpartyId::new(),
            bill_number: "BILL-7".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            total_amount: total,
            paid_amount: paid,
            status: if paid > Decimal::ZERO {
                BillStatus::PartiallyPaid
            } else {
                BillStatus::Pending
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn accounts() -> PaymentLedgerAccounts {
        PaymentLedgerAccounts {
            counterparty_control: AccountId::new(),
            settlement: AccountId::new(),
        }
    }

    fn input(amount: Decimal) -> PaymentInput {
        PaymentInput {
            amount,
            date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            method: PaymentMethod::BankTransfer,
            bank_account_id: None,
            idempotency_key: "pay-001".to_string(),
        }
    }

    #[test]
    fn test_overpayment_rejected() {
        // Bill with total 1000, paid 600: 450 > 400 remaining.
        let bill = make_bill(BillKind::Payable, dec!(1000), dec!(600));
        let result = BillingService::plan_payment(&bill, &input(dec!(450)), &accounts());
        assert!(matches!(
            result,
            Err(BillingError::Overpayment { remaining, .. }) if remaining == dec!(400)
        ));
    }

    #[test]
    fn test_exact_remainder_settles() {
        let bill = make_bill(BillKind::Payable, dec!(1000), dec!(600));
        let plan = BillingService::plan_payment(&bill, &input(dec!(400)), &accounts()).unwrap();
        assert_eq!(plan.new_paid_amount, dec!(1000));
        assert_eq!(plan.new_status, BillStatus::Paid);
    }

    #[test]
    fn test_partial_payment_status() {
        let bill = make_bill(BillKind::Payable, dec!(1000), dec!(0));
        let plan = BillingService::plan_payment(&bill, &input(dec!(250)), &accounts()).unwrap();
        assert_eq!(plan.new_paid_amount, dec!(250));
        assert_eq!(plan.new_status, BillStatus::PartiallyPaid);
    }

    #[test]
    fn test_payable_lines_debit_control() {
        let bill = make_bill(BillKind::Payable, dec!(500), dec!(0));
        let accs = accounts();
        let plan = BillingService::plan_payment(&bill, &input(dec!(500)), &accs).unwrap();

        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[0].account_id, accs.counterparty_control);
        assert_eq!(plan.lines[0].debit, dec!(500));
        assert_eq!(plan.lines[1].account_id, accs.settlement);
        assert_eq!(plan.lines[1].credit, dec!(500));
    }

    #[test]
    fn test_receivable_lines_debit_settlement() {
        let bill = make_bill(BillKind::Receivable, dec!(500), dec!(0));
        let accs = accounts();
        let plan = BillingService::plan_payment(&bill, &input(dec!(500)), &accs).unwrap();

        assert_eq!(plan.lines[0].account_id, accs.settlement);
        assert_eq!(plan.lines[0].debit, dec!(500));
        assert_eq!(plan.lines[1].account_id, accs.counterparty_control);
        assert_eq!(plan.lines[1].credit, dec!(500));
    }

    #[test]
    fn test_bank_movement_direction() {
        let bank = BankAccountId::new();
        let mut pay_input = input(dec!(100));
        pay_input.bank_account_id = Some(bank);

        let payable = make_bill(BillKind::Payable, dec!(100), dec!(0));
        let plan = BillingService::plan_payment(&payable, &pay_input, &accounts()).unwrap();
        let movement = plan.bank_movement.unwrap();
        assert_eq!(movement.direction, TxnDirection::Withdrawal);
        assert_eq!(movement.bank_account_id, bank);

        let receivable = make_bill(BillKind::Receivable, dec!(100), dec!(0));
        let plan = BillingService::plan_payment(&receivable, &pay_input, &accounts()).unwrap();
        assert_eq!(plan.bank_movement.unwrap().direction, TxnDirection::Deposit);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let bill = make_bill(BillKind::Payable, dec!(100), dec!(0));
        assert!(matches!(
            BillingService::plan_payment(&bill, &input(Decimal::ZERO), &accounts()),
            Err(BillingError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_missing_idempotency_key_rejected() {
        let bill = make_bill(BillKind::Payable, dec!(100), dec!(0));
        let mut bad = input(dec!(50));
        bad.idempotency_key = String::new();
        assert!(matches!(
            BillingService::plan_payment(&bill, &bad, &accounts()),
            Err(BillingError::MissingIdempotencyKey)
        ));
    }

    #[test]
    fn test_settled_bill_rejects_payment() {
        let bill = make_bill(BillKind::Payable, dec!(100), dec!(100));
        assert!(matches!(
            BillingService::plan_payment(&bill, &input(dec!(1)), &accounts()),
            Err(BillingError::AlreadyPaid(_))
        ));
    }

    #[test]
    fn test_adjustment_settles_remainder() {
        let bill = make_bill(BillKind::Payable, dec!(1000), dec!(250));
        let plan = BillingService::plan_adjustment(&bill, &accounts()).unwrap();
        assert_eq!(plan.amount, dec!(750));
        assert_eq!(plan.new_status, BillStatus::Paid);
        assert!(plan.bank_movement.is_none());
    }

    #[test]
    fn test_adjustment_on_settled_bill_rejected() {
        let bill = make_bill(BillKind::Payable, dec!(1000), dec!(1000));
        assert!(matches!(
            BillingService::plan_adjustment(&bill, &accounts()),
            Err(BillingError::AlreadyPaid(_))
        ));
    }

    #[test]
    fn test_validate_new_bill() {
        let issue = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let due = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert!(BillingService::validate_new_bill("INV-1", dec!(100), issue, due).is_ok());
        assert!(matches!(
            BillingService::validate_new_bill("", dec!(100), issue, due),
            Err(BillingError::Validation(_))
        ));
        assert!(matches!(
            BillingService::validate_new_bill("INV-1", Decimal::ZERO, issue, due),
            Err(BillingError::NonPositiveTotal)
        ));
        assert!(matches!(
            BillingService::validate_new_bill("INV-1", dec!(100), due, issue),
            Err(BillingError::Validation(_))
        ));
    }
}
