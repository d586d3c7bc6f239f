//! Fund transfer error types.

use thiserror::Error;
use khata_shared::types::BankAccountId;

/// Errors that can occur during fund transfers.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Source and destination must differ.
    #[error("Cannot transfer between an account and itself")]
    SameAccount,

    /// One of the accounts is inactive.
    #[error("Bank account {0} is inactive")]
    InactiveAccount(BankAccountId),

    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    NotFound(BankAccountId),

    /// Amount must be positive.
    #[error("Transfer amount must be positive")]
    NonPositiveAmount,

    /// Reference is required (it doubles as the idempotency key).
    #[error("Transfer reference is required")]
    MissingReference,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl TransferError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SameAccount => "SAME_ACCOUNT",
            Self::InactiveAccount(_) => "ACCOUNT_INACTIVE",
            Self::NotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::MissingReference => "MISSING_REFERENCE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::SameAccount
            | Self::InactiveAccount(_)
            | Self::NonPositiveAmount
            | Self::MissingReference => 400,
            Self::NotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_status() {
        assert_eq!(TransferError::SameAccount.error_code(), "SAME_ACCOUNT");
        assert_eq!(TransferError::SameAccount.http_status_code(), 400);
        assert_eq!(
            TransferError::NotFound(BankAccountId::new()).http_status_code(),
            404
        );
        assert_eq!(TransferError::Database("x".into()).http_status_code(), 500);
    }
}
