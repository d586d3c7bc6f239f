//! Receivable/payable aging classification.
//!
//! Buckets outstanding bills into days-overdue windows and produces one
//! summary for receivables and one for payables.

pub mod bucket;
pub mod report;

pub use bucket::AgingBucket;
pub use report::{AgedBill, AgingReport, AgingSummary, BucketSubtotal, aging_report, classify};
