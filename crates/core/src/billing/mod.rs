//! Bills, invoices, and payment settlement.
//!
//! Vendor bills and customer invoices share one model distinguished by
//! `BillKind`. Payments are validated here (overpayment, status
//! transitions) and planned as a bundle: bill mutation + journal lines +
//! optional bank movement, which the repository layer commits atomically.

pub mod bill;
pub mod error;
pub mod service;

pub use bill::{Bill, BillKind, BillStatus, Payment, PaymentMethod};
pub use error::BillingError;
pub use service::{BillingService, PaymentInput, PaymentLedgerAccounts, PaymentPlan};
