//! Account balance derivation and financial roll-ups.
//!
//! The cached `current_balance` on an account is a convenience; the posted
//! line log is the source of truth. This module derives balances from that
//! log, verifies caches against it, and rolls account balances up into
//! summary financial metrics.

pub mod calculator;
pub mod summary;

pub use calculator::{BalanceError, BalanceCalculator, PostedLine};
pub use summary::{AccountBalanceRow, FinancialSummary, TypeSummary, summarize};
