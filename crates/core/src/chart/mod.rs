//! Chart of accounts domain logic.
//!
//! This module implements account metadata and the rules governing the
//! account tree:
//! - Account types and their fixed normal balance
//! - Hierarchy validation (no cycles, active parents only)
//! - Deactivation rules (accounts with activity are never deleted)

pub mod account;
pub mod error;
pub mod service;

pub use account::{Account, AccountType, NormalBalance};
pub use error::ChartError;
pub use service::ChartService;
