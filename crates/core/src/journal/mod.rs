//! Double-entry journal logic.
//!
//! This module implements journal entry validation and resolution:
//! - Line-level checks (one side set, positive amounts)
//! - Entry-level balance check (debits == credits, zero tolerance)
//! - Signed balance effects per account normal balance
//! - Reversal as a new compensating entry, never an in-place edit

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::JournalError;
pub use service::{JournalService, PostingAccount};
pub use types::{
    EntryTotals, JournalStatus, LineInput, PostEntryInput, ResolvedLine, journal_number,
};
