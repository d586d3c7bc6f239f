//! `SeaORM` entity definitions.
//!
//! Entities are plain rows; domain behavior lives in `khata-core` and the
//! conversions between the two live next to each entity.

pub mod accounts;
pub mod bank_accounts;
pub mod bank_transactions;
pub mod bills;
pub mod journal_entries;
pub mod journal_lines;
pub mod payments;
pub mod sea_orm_active_enums;
