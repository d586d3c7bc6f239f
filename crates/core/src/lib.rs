//! Core business logic for the Khata financial ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `chart` - Chart of accounts: account types, hierarchy, activation rules
//! - `journal` - Double-entry journal posting and reversal
//! - `balance` - Account balance derivation and financial roll-ups
//! - `billing` - Vendor bills / customer invoices and payment settlement
//! - `transfer` - Fund transfers between bank/UPI/cash accounts
//! - `aging` - Receivable/payable aging classification

pub mod aging;
pub mod balance;
pub mod billing;
pub mod chart;
pub mod journal;
pub mod transfer;
