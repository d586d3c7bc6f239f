//! Billing error types.

use rust_decimal::Decimal;
use thiserror::Error;
use khata_shared::types::{BankAccountId, BillId};

use crate::journal::JournalError;

/// Errors that can occur during billing operations.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Payment exceeds the outstanding balance.
    #[error("Payment of {amount} exceeds remaining balance of {remaining}")]
    Overpayment {
        /// The attempted payment amount.
        amount: Decimal,
        /// The remaining balance on the bill.
        remaining: Decimal,
    },

    /// Bill not found.
    #[error("Bill not found: {0}")]
    NotFound(BillId),

    /// Payment amount must be positive.
    #[error("Payment amount must be positive")]
    NonPositiveAmount,

    /// Bill total must be positive.
    #[error("Bill total must be positive")]
    NonPositiveTotal,

    /// Bill is already fully settled.
    #[error("Bill {0} is already fully paid")]
    AlreadyPaid(BillId),

    /// Idempotency key is required on payments.
    #[error("Payment idempotency key is required")]
    MissingIdempotencyKey,

    /// The idempotency key was already used against a different bill.
    #[error("Idempotency key already recorded against a different bill")]
    IdempotencyKeyReused,

    /// The money account named by the payment does not exist.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(BankAccountId),

    /// The money account named by the payment is inactive.
    #[error("Bank account {0} is inactive")]
    InactiveBankAccount(BankAccountId),

    /// Validation error (missing fields, bad dates).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The payment's journal posting failed validation.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl BillingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::NotFound(_) => "BILL_NOT_FOUND",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::NonPositiveTotal => "NON_POSITIVE_TOTAL",
            Self::AlreadyPaid(_) => "ALREADY_PAID",
            Self::MissingIdempotencyKey => "MISSING_IDEMPOTENCY_KEY",
            Self::IdempotencyKeyReused => "IDEMPOTENCY_KEY_REUSED",
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::InactiveBankAccount(_) => "BANK_ACCOUNT_INACTIVE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Journal(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Overpayment { .. }
            | Self::NonPositiveAmount
            | Self::NonPositiveTotal
            | Self::AlreadyPaid(_)
            | Self::MissingIdempotencyKey
            | Self::InactiveBankAccount(_)
            | Self::Validation(_) => 400,
            Self::IdempotencyKeyReused => 409,
            Self::NotFound(_) | Self::BankAccountNotFound(_) => 404,
            Self::Journal(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}
