//! Journal error types for validation and state errors.

use rust_decimal::Decimal;
use thiserror::Error;
use khata_shared::types::{AccountId, JournalEntryId};

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    EmptyEntry,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// A line must set exactly one of debit or credit.
    #[error("Line must set either debit or credit, not both")]
    BothSidesSet,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    // ========== State Errors ==========
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    NotFound(JournalEntryId),

    /// Only posted entries can be reversed.
    #[error("Only posted entries can be reversed")]
    NotPosted,

    /// Posted entries are immutable.
    #[error("Cannot modify posted entry")]
    CannotModifyPosted,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::BothSidesSet => "BOTH_SIDES_SET",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::NotFound(_) => "ENTRY_NOT_FOUND",
            Self::NotPosted => "ENTRY_NOT_POSTED",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyEntry
            | Self::Unbalanced { .. }
            | Self::ZeroAmount
            | Self::NegativeAmount
            | Self::BothSidesSet
            | Self::AccountInactive(_)
            | Self::NotPosted
            | Self::CannotModifyPosted => 400,

            Self::AccountNotFound(_) | Self::NotFound(_) => 404,

            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(JournalError::EmptyEntry.error_code(), "EMPTY_ENTRY");
        assert_eq!(
            JournalError::Unbalanced {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(JournalError::ZeroAmount.error_code(), "ZERO_AMOUNT");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(JournalError::EmptyEntry.http_status_code(), 400);
        assert_eq!(
            JournalError::AccountNotFound(AccountId::new()).http_status_code(),
            404
        );
        assert_eq!(
            JournalError::Database("boom".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = JournalError::Unbalanced {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }
}
