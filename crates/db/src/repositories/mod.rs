//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Validation lives in `khata-core`; repositories resolve
//! rows, feed them to the core services, and commit the resulting plans
//! atomically.

pub mod account;
pub mod billing;
pub mod journal;
pub mod reporting;
pub mod transfer;

#[cfg(test)]
mod transfer_integration_tests;

pub use account::{AccountFilter, AccountRepository, CreateAccountInput};
pub use billing::{AdjustmentOutcome, BillingRepository, CreateBillInput, PaymentOutcome};
pub use journal::{JournalRepository, PostedEntry};
pub use reporting::{ReportingError, ReportingRepository};
pub use transfer::{CreateBankAccountInput, TransferOutcome, TransferRepository};
