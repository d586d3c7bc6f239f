//! Aging bucket policy.

use serde::{Deserialize, Serialize};

/// A days-outstanding window.
///
/// Policy: up to 30 days is "Current" (this includes not-yet-due bills,
/// whose days outstanding are negative), then 30-day windows up to 120,
/// then everything older.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgingBucket {
    /// Due within the last 30 days, or not yet due.
    Current,
    /// 31-60 days outstanding.
    Days31To60,
    /// 61-90 days outstanding.
    Days61To90,
    /// 91-120 days outstanding.
    Days91To120,
    /// More than 120 days outstanding.
    Over120,
}

impl AgingBucket {
    /// Classifies a days-outstanding count.
    #[must_use]
    pub const fn from_days(days: i64) -> Self {
        match days {
            i64::MIN..=30 => Self::Current,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            91..=120 => Self::Days91To120,
            _ => Self::Over120,
        }
    }

    /// The label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Days91To120 => "91-120",
            Self::Over120 => "120+",
        }
    }

    /// All buckets, in report order.
    pub const ALL: [Self; 5] = [
        Self::Current,
        Self::Days31To60,
        Self::Days61To90,
        Self::Days91To120,
        Self::Over120,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-15, AgingBucket::Current)]
    #[case(0, AgingBucket::Current)]
    #[case(30, AgingBucket::Current)]
    #[case(31, AgingBucket::Days31To60)]
    #[case(60, AgingBucket::Days31To60)]
    #[case(61, AgingBucket::Days61To90)]
    #[case(90, AgingBucket::Days61To90)]
    #[case(91, AgingBucket::Days91To120)]
    #[case(120, AgingBucket::Days91To120)]
    #[case(121, AgingBucket::Over120)]
    #[case(500, AgingBucket::Over120)]
    fn test_bucket_boundaries(#[case] days: i64, #[case] expected: AgingBucket) {
        assert_eq!(AgingBucket::from_days(days), expected);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AgingBucket::Current.label(), "Current");
        assert_eq!(AgingBucket::Over120.label(), "120+");
    }
}
