use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::transaction::{EntryKind, Transaction};

/// A named relative-date window used to scope queries.
///
/// `Week` is a rolling seven-day window measured from the reference
/// instant, not an ISO calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl Period {
    /// Whether a transaction date falls inside the window anchored at `now`.
    pub fn contains(&self, date: NaiveDate, now: NaiveDateTime) -> bool {
        match self {
            Period::Today => date == now.date(),
            Period::Week => date.and_time(NaiveTime::MIN) >= now - Duration::days(7),
            Period::Month => date.month() == now.month() && date.year() == now.year(),
            Period::Year => date.year() == now.year(),
            Period::All => true,
        }
    }
}

/// Independently combinable transaction filters, joined with logical AND.
///
/// An absent field passes every record through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<EntryKind>,
    pub category: Option<String>,
    pub period: Period,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn matches(&self, transaction: &Transaction, now: NaiveDateTime) -> bool {
        if let Some(kind) = self.kind {
            if transaction.kind != kind {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref() {
            if transaction.category != category {
                return false;
            }
        }
        self.period.contains(transaction.date, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn today_requires_calendar_equality() {
        let now = reference();
        assert!(Period::Today.contains(date(2025, 3, 15), now));
        assert!(!Period::Today.contains(date(2025, 3, 14), now));
    }

    #[test]
    fn week_is_a_rolling_window() {
        let now = reference();
        assert!(Period::Week.contains(date(2025, 3, 9), now));
        // Midnight of the seventh day back precedes `now - 7d` (14:30).
        assert!(!Period::Week.contains(date(2025, 3, 8), now));
        // No upper bound: future-dated entries pass through.
        assert!(Period::Week.contains(date(2025, 4, 1), now));
    }

    #[test]
    fn month_matches_month_and_year() {
        let now = reference();
        assert!(Period::Month.contains(date(2025, 3, 1), now));
        assert!(!Period::Month.contains(date(2024, 3, 15), now));
        assert!(!Period::Month.contains(date(2025, 2, 28), now));
    }

    #[test]
    fn year_matches_year_only() {
        let now = reference();
        assert!(Period::Year.contains(date(2025, 12, 31), now));
        assert!(!Period::Year.contains(date(2024, 12, 31), now));
    }
}
