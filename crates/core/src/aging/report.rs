//! Aging report construction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use khata_shared::types::{BillId, CounterpartyId};

use super::bucket::AgingBucket;
use crate::billing::{Bill, BillKind};

/// One outstanding bill, aged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgedBill {
    /// The bill.
    pub bill_id: BillId,
    /// Document number.
    pub bill_number: String,
    /// The counterparty owing / owed.
    pub counterparty_id: CounterpartyId,
    /// Due date.
    pub due_date: NaiveDate,
    /// `as_of - due_date` in days; negative when not yet due.
    pub days_outstanding: i64,
    /// The bucket this bill falls in.
    pub bucket: AgingBucket,
    /// Outstanding amount.
    pub remaining_amount: Decimal,
}

/// Subtotal for one bucket.
#[derive(Debug, Clone, Serialize)]
pub struct BucketSubtotal {
    /// Bucket label ("Current", "31-60", ...).
    pub bucket: &'static str,
    /// Sum of remaining amounts in this bucket.
    pub total: Decimal,
    /// Number of bills in this bucket.
    pub count: usize,
}

/// Aging summary for one side of the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct AgingSummary {
    /// As-of date the report was computed for.
    pub as_of: NaiveDate,
    /// Subtotals per bucket, in report order. Their sum equals
    /// `total_outstanding`.
    pub buckets: Vec<BucketSubtotal>,
    /// Aged bills, sorted by days outstanding descending.
    pub entries: Vec<AgedBill>,
    /// Total outstanding across all buckets.
    pub total_outstanding: Decimal,
}

/// Receivables and payables, summarized separately.
#[derive(Debug, Clone, Serialize)]
pub struct AgingReport {
    /// Customer invoices with outstanding balances.
    pub receivables: AgingSummary,
    /// Vendor bills with outstanding balances.
    pub payables: AgingSummary,
}

/// Classifies outstanding bills into aging buckets.
///
/// Only bills with a positive remaining amount are included. Output is
/// sorted by days outstanding, oldest debt first.
#[must_use]
pub fn classify(bills: &[Bill], as_of: NaiveDate) -> AgingSummary {
    let mut entries: Vec<AgedBill> = bills
        .iter()
        .filter(|b| b.remaining_amount() > Decimal::ZERO)
        .map(|b| {
            let days_outstanding = (as_of - b.due_date).num_days();
            AgedBill {
                bill_id: b.id,
                bill_number: b.bill_number.clone(),
                counterparty_id: b.counterparty_id,
                due_date: b.due_date,
                days_outstanding,
                bucket: AgingBucket::from_days(days_outstanding),
                remaining_amount: b.remaining_amount(),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.days_outstanding.cmp(&a.days_outstanding));

    let buckets = AgingBucket::ALL
        .iter()
        .map(|bucket| {
            let in_bucket: Vec<&AgedBill> =
                entries.iter().filter(|e| e.bucket == *bucket).collect();
            BucketSubtotal {
                bucket: bucket.label(),
                total: in_bucket.iter().map(|e| e.remaining_amount).sum(),
                count: in_bucket.len(),
            }
        })
        .collect();

    let total_outstanding = entries.iter().map(|e| e.remaining_amount).sum();

    AgingSummary {
        as_of,
        buckets,
        entries,
        total_outstanding,
    }
}

/// Builds the full aging report: one summary per bill kind.
#[must_use]
pub fn aging_report(bills: &[Bill], as_of: NaiveDate) -> AgingReport {
    let (receivables, payables): (Vec<Bill>, Vec<Bill>) = bills
        .iter()
        .cloned()
        .partition(|b| b.kind == BillKind::Receivable);

    AgingReport {
        receivables: classify(&receivables, as_of),
        payables: classify(&payables, as_of),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::BillStatus;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn make_bill(kind: BillKind, due: NaiveDate, total: Decimal, paid: Decimal) -> Bill {
        Bill {
            id: BillId::new(),
            kind,
            counterparty_id: CounterpartyId::new(),
            bill_number: format!("B-{due}"),
            issue_date: due,
            due_date: due,
            total_amount: total,
            paid_amount: paid,
            status: BillStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_boundary_30_and_31_days() {
        let as_of = date(2026, 3, 31);
        let bills = vec![
            // Due exactly 30 days before as_of: Current.
            make_bill(BillKind::Payable, date(2026, 3, 1), dec!(100), dec!(0)),
            // Due 31 days before as_of: 31-60.
            make_bill(BillKind::Payable, date(2026, 2, 28), dec!(200), dec!(0)),
        ];
        let summary = classify(&bills, as_of);

        assert_eq!(summary.entries.len(), 2);
        let current = summary.buckets.iter().find(|b| b.bucket == "Current").unwrap();
        assert_eq!(current.total, dec!(100));
        let thirty_one = summary.buckets.iter().find(|b| b.bucket == "31-60").unwrap();
        assert_eq!(thirty_one.total, dec!(200));
    }

    #[test]
    fn test_settled_bills_excluded() {
        let as_of = date(2026, 3, 31);
        let bills = vec![
            make_bill(BillKind::Payable, date(2026, 1, 1), dec!(100), dec!(100)),
            make_bill(BillKind::Payable, date(2026, 1, 1), dec!(100), dec!(40)),
        ];
        let summary = classify(&bills, as_of);
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.total_outstanding, dec!(60));
    }

    #[test]
    fn test_sorted_oldest_first() {
        let as_of = date(2026, 6, 30);
        let bills = vec![
            make_bill(BillKind::Payable, date(2026, 6, 1), dec!(10), dec!(0)),
            make_bill(BillKind::Payable, date(2026, 1, 1), dec!(20), dec!(0)),
            make_bill(BillKind::Payable, date(2026, 4, 1), dec!(30), dec!(0)),
        ];
        let summary = classify(&bills, as_of);
        let days: Vec<i64> = summary.entries.iter().map(|e| e.days_outstanding).collect();
        assert!(days.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_not_yet_due_is_current_with_negative_days() {
        let as_of = date(2026, 3, 1);
        let bills = vec![make_bill(BillKind::Receivable, date(2026, 4, 1), dec!(75), dec!(0))];
        let summary = classify(&bills, as_of);
        assert_eq!(summary.entries[0].days_outstanding, -31);
        assert_eq!(summary.entries[0].bucket, AgingBucket::Current);
    }

    #[test]
    fn test_bucket_subtotals_sum_to_total() {
        let as_of = date(2026, 12, 31);
        let bills: Vec<Bill> = (1..=10)
            .map(|i| {
                make_bill(
                    BillKind::Payable,
                    date(2026, i, 1),
                    Decimal::from(i * 100),
                    Decimal::ZERO,
                )
            })
            .collect();
        let summary = classify(&bills, as_of);
        let bucket_sum: Decimal = summary.buckets.iter().map(|b| b.total).sum();
        assert_eq!(bucket_sum, summary.total_outstanding);
    }

    #[test]
    fn test_report_splits_by_kind() {
        let as_of = date(2026, 3, 31);
        let bills = vec![
            make_bill(BillKind::Payable, date(2026, 3, 1), dec!(100), dec!(0)),
            make_bill(BillKind::Receivable, date(2026, 3, 1), dec!(250), dec!(0)),
        ];
        let report = aging_report(&bills, as_of);
        assert_eq!(report.payables.total_outstanding, dec!(100));
        assert_eq!(report.receivables.total_outstanding, dec!(250));
    }
}
