//! Fund transfers between bank, UPI, and cash accounts.
//!
//! A transfer is planned as exactly two movements (a withdrawal and a
//! deposit) sharing one reference; the repository layer commits both,
//! together with both cached balance updates, in a single database
//! transaction.

pub mod error;
pub mod service;
pub mod types;

pub use error::TransferError;
pub use service::TransferService;
pub use types::{
    BankAccountKind, BankAccountRef, BankMovement, TransferPlan, TransferRequest, TxnDirection,
};
