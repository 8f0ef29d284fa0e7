use serde::{Deserialize, Serialize};
use time::Date;

/// Days-left threshold (inclusive) under which an ingredient counts as expiring soon.
pub const DEFAULT_SOON_THRESHOLD_DAYS: u32 = 3;

/// Freshness of a stored ingredient on a given day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Fresh,
    ExpiringSoon,
    Expired,
    Unknown, // no expiry date recorded
}

/// Maps an expiry date to an [`ExpiryStatus`] relative to a caller-supplied `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryClassifier {
    pub soon_threshold_days: u32,
}

impl Default for ExpiryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SOON_THRESHOLD_DAYS)
    }
}

impl ExpiryClassifier {
    pub fn new(soon_threshold_days: u32) -> Self {
        Self { soon_threshold_days }
    }

    /// `expired` when the date is in the past, `expiring_soon` from today up to
    /// and including `today + soon_threshold_days`, `fresh` after that.
    pub fn classify(&self, today: Date, expiry_date: Option<Date>) -> ExpiryStatus {
        match days_left(today, expiry_date) {
            None => ExpiryStatus::Unknown,
            Some(d) if d < 0 => ExpiryStatus::Expired,
            Some(d) if d <= i64::from(self.soon_threshold_days) => ExpiryStatus::ExpiringSoon,
            Some(_) => ExpiryStatus::Fresh,
        }
    }
}

/// Whole days from `today` until `expiry_date`; negative once the date has passed.
pub fn days_left(today: Date, expiry_date: Option<Date>) -> Option<i64> {
    expiry_date.map(|d| (d - today).whole_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, Duration};

    const TODAY: Date = date!(2024 - 06 - 10);

    fn sample_days() -> Vec<Date> {
        vec![
            date!(2020 - 02 - 29),
            date!(2023 - 12 - 31),
            date!(2024 - 01 - 01),
            TODAY,
            date!(2024 - 12 - 31),
        ]
    }

    #[test]
    fn concrete_pantry_scenario() {
        let c = ExpiryClassifier::default();
        assert_eq!(c.classify(TODAY, Some(date!(2024 - 06 - 09))), ExpiryStatus::Expired);
        assert_eq!(c.classify(TODAY, Some(date!(2024 - 06 - 12))), ExpiryStatus::ExpiringSoon);
        assert_eq!(c.classify(TODAY, Some(date!(2025 - 01 - 01))), ExpiryStatus::Fresh);
    }

    #[test]
    fn same_day_is_expiring_not_expired() {
        let c = ExpiryClassifier::default();
        for d in sample_days() {
            assert_eq!(c.classify(d, Some(d)), ExpiryStatus::ExpiringSoon);
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        for threshold in [0u32, 1, 3, 7, 30] {
            let c = ExpiryClassifier::new(threshold);
            for d in sample_days() {
                let edge = d + Duration::days(i64::from(threshold));
                assert_eq!(c.classify(d, Some(edge)), ExpiryStatus::ExpiringSoon);
                assert_eq!(
                    c.classify(d, Some(edge + Duration::days(1))),
                    ExpiryStatus::Fresh
                );
            }
        }
    }

    #[test]
    fn past_or_today_is_never_fresh() {
        let c = ExpiryClassifier::default();
        for d in sample_days() {
            for back in 0..400 {
                let expiry = d - Duration::days(back);
                assert_ne!(c.classify(d, Some(expiry)), ExpiryStatus::Fresh);
            }
        }
    }

    #[test]
    fn missing_date_is_unknown() {
        let c = ExpiryClassifier::new(10);
        for d in sample_days() {
            assert_eq!(c.classify(d, None), ExpiryStatus::Unknown);
        }
    }

    #[test]
    fn classify_is_stable_across_calls() {
        let c = ExpiryClassifier::default();
        let expiry = Some(date!(2024 - 06 - 11));
        assert_eq!(c.classify(TODAY, expiry), c.classify(TODAY, expiry));
    }

    #[test]
    fn days_left_counts_calendar_days() {
        assert_eq!(days_left(TODAY, None), None);
        assert_eq!(days_left(TODAY, Some(TODAY)), Some(0));
        assert_eq!(days_left(TODAY, Some(date!(2024 - 06 - 09))), Some(-1));
        assert_eq!(days_left(date!(2024 - 02 - 28), Some(date!(2024 - 03 - 01))), Some(2));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ExpiryStatus::ExpiringSoon).unwrap();
        assert_eq!(json, "\"expiring_soon\"");
    }
}
