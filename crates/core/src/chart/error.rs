//! Chart of accounts error types.

use thiserror::Error;
use khata_shared::types::AccountId;

/// Errors that can occur during chart of accounts operations.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Account code already exists.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Parent account is missing, inactive, or would create a cycle.
    #[error("Invalid account hierarchy: {0}")]
    InvalidHierarchy(String),

    /// Account not found by id or code.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Account has postings or active children and cannot be deactivated.
    #[error("Account {0} has activity and cannot be deactivated")]
    HasActivity(AccountId),

    /// Account is inactive.
    #[error("Account {0} is inactive")]
    Inactive(AccountId),

    /// Validation error (missing fields, bad code format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ChartError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::InvalidHierarchy(_) => "INVALID_HIERARCHY",
            Self::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::HasActivity(_) => "ACCOUNT_HAS_ACTIVITY",
            Self::Inactive(_) => "ACCOUNT_INACTIVE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateCode(_) => 409,
            Self::InvalidHierarchy(_)
            | Self::HasActivity(_)
            | Self::Inactive(_)
            | Self::Validation(_) => 400,
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
        assert_eq!(
            ChartError::DuplicateCode("2100".into()).error_code(),
            "DUPLICATE_CODE"
        );
        assert_eq!(ChartError::DuplicateCode("2100".into()).http_status_code(), 409);
        assert_eq!(
            ChartError::NotFound("2100".into()).http_status_code(),
            404
        );
        assert_eq!(
            ChartError::HasActivity(AccountId::new()).http_status_code(),
            400
        );
        assert_eq!(
            ChartError::Database("boom".into()).http_status_code(),
            500
        );
    }
}
