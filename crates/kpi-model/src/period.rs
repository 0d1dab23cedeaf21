//! Report period and date-recency windows.
//!
//! A report is cut at the end of a calendar month. Recency is measured
//! backwards from the last day of that month using 30-day months: a date
//! `d` is recent when `reference - window < d <= reference`.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earliest date accepted as plausible in a registry.
pub const EARLIEST_PLAUSIBLE_YEAR: i32 = 1900;

const DAYS_PER_WINDOW_MONTH: i64 = 30;

/// Errors raised when building a report period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("invalid report month {month} (expected 1-12)")]
    InvalidMonth { month: u32 },

    #[error("invalid report year {year}")]
    InvalidYear { year: i32 },
}

/// Control windows used by the recency checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecencyWindow {
    /// Blood pressure and HbA1c follow-up.
    SixMonths,
    /// Creatinine and microalbuminuria screening.
    TwelveMonths,
}

impl RecencyWindow {
    pub fn months(self) -> i64 {
        match self {
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
        }
    }

    pub fn days(self) -> i64 {
        self.months() * DAYS_PER_WINDOW_MONTH
    }
}

/// Cutoff (year, month) of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
    year: i32,
    month: u32,
}

impl ReportPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth { month });
        }
        if !(EARLIEST_PLAUSIBLE_YEAR..=9999).contains(&year) {
            return Err(PeriodError::InvalidYear { year });
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Last calendar day of the report month.
    pub fn reference_date(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Dates outside this range are considered dubious.
    pub fn plausible_range(&self) -> (NaiveDate, NaiveDate) {
        let earliest =
            NaiveDate::from_ymd_opt(EARLIEST_PLAUSIBLE_YEAR, 1, 1).unwrap_or(NaiveDate::MIN);
        (earliest, self.reference_date())
    }

    pub fn is_plausible(&self, date: NaiveDate) -> bool {
        let (earliest, latest) = self.plausible_range();
        date >= earliest && date <= latest
    }

    /// True when `date` falls inside `window` counted back from the cutoff.
    pub fn is_recent(&self, date: NaiveDate, window: RecencyWindow) -> bool {
        let reference = self.reference_date();
        let opens_after = reference - Duration::days(window.days());
        date > opens_after && date <= reference
    }

    /// Recency of an optional date; absent dates are never recent.
    pub fn is_recent_opt(&self, date: Option<NaiveDate>, window: RecencyWindow) -> bool {
        date.is_some_and(|d| self.is_recent(d, window))
    }

    /// Human label such as `2025-07`.
    pub fn label(&self) -> String {
        let date = self.reference_date();
        format!("{:04}-{:02}", date.year(), date.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(
            ReportPeriod::new(2025, 13),
            Err(PeriodError::InvalidMonth { month: 13 })
        );
        assert_eq!(
            ReportPeriod::new(2025, 0),
            Err(PeriodError::InvalidMonth { month: 0 })
        );
    }

    #[test]
    fn test_reference_date() {
        assert_eq!(ReportPeriod::new(2025, 7).unwrap().reference_date(), date(2025, 7, 31));
        assert_eq!(ReportPeriod::new(2024, 2).unwrap().reference_date(), date(2024, 2, 29));
        assert_eq!(ReportPeriod::new(2024, 12).unwrap().reference_date(), date(2024, 12, 31));
    }

    #[test]
    fn test_six_month_boundary() {
        let period = ReportPeriod::new(2025, 7).unwrap();
        let window = RecencyWindow::SixMonths;
        assert!(!period.is_recent(date(2025, 2, 1), window));
        assert!(period.is_recent(date(2025, 2, 2), window));
        assert!(period.is_recent(date(2025, 2, 15), window));
        assert!(period.is_recent(date(2025, 7, 31), window));
        assert!(!period.is_recent(date(2025, 8, 1), window));
    }

    #[test]
    fn test_twelve_month_boundary() {
        let period = ReportPeriod::new(2025, 7).unwrap();
        let window = RecencyWindow::TwelveMonths;
        // 2025-07-31 minus 360 days is 2024-08-05.
        assert!(!period.is_recent(date(2024, 8, 5), window));
        assert!(period.is_recent(date(2024, 8, 6), window));
    }

    #[test]
    fn test_absent_date_not_recent() {
        let period = ReportPeriod::new(2025, 7).unwrap();
        assert!(!period.is_recent_opt(None, RecencyWindow::SixMonths));
    }

    #[test]
    fn test_plausible() {
        let period = ReportPeriod::new(2025, 7).unwrap();
        assert!(period.is_plausible(date(1950, 1, 1)));
        assert!(!period.is_plausible(date(1899, 12, 31)));
        assert!(!period.is_plausible(date(2025, 8, 1)));
        assert_eq!(period.label(), "2025-07");
    }
}
