//! Report windows.
//!
//! All windows are half-open `[start, end)` in UTC, so a day window ends at
//! the next midnight.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::error::ReportError;

/// A half-open UTC time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn next_day(date: NaiveDate) -> Result<NaiveDate, ReportError> {
    date.succ_opt()
        .ok_or_else(|| ReportError::InvalidDate(date.to_string()))
}

impl ReportWindow {
    /// The whole of `date`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDate` for the last representable date.
    pub fn day(date: NaiveDate) -> Result<Self, ReportError> {
        Ok(Self {
            start: start_of_day(date),
            end: start_of_day(next_day(date)?),
        })
    }

    /// The whole calendar month.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidMonth` unless `month` is 1-12.
    pub fn month(year: i32, month: u32) -> Result<Self, ReportError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ReportError::InvalidMonth(month))?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .ok_or_else(|| ReportError::InvalidDate(format!("{next_year}-{next_month:02}")))?;
        Ok(Self {
            start: start_of_day(first),
            end: start_of_day(next),
        })
    }

    /// From the start of `start` through the end of `end`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `start > end`.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self {
            start: start_of_day(start),
            end: start_of_day(next_day(end)?),
        })
    }

    /// The `days` days ending with (and including) `end_date`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDuration` if `days < 1` or the window
    /// does not fit in the calendar.
    pub fn trailing_days(end_date: NaiveDate, days: i64) -> Result<Self, ReportError> {
        if days < 1 {
            return Err(ReportError::InvalidDuration(days));
        }
        let end = start_of_day(next_day(end_date)?);
        let start = Duration::try_days(days)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or(ReportError::InvalidDuration(days))?;
        Ok(Self { start, end })
    }

    /// The month containing `date`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDate` if the following month is outside
    /// chrono's calendar.
    pub fn month_of(date: NaiveDate) -> Result<Self, ReportError> {
        Self::month(date.year(), date.month())
    }

    /// Returns true if `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_window() {
        let window = ReportWindow::day(date(2026, 3, 14)).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
        assert!(window.contains(Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap()));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn test_month_window_wraps_year() {
        let window = ReportWindow::month(2025, 12).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());

        assert_eq!(ReportWindow::month_of(date(2025, 12, 31)).unwrap(), window);
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(ReportWindow::month(2026, 0), Err(ReportError::InvalidMonth(0))));
        assert!(matches!(ReportWindow::month(2026, 13), Err(ReportError::InvalidMonth(13))));
    }

    #[test]
    fn test_range_includes_whole_end_day() {
        let window = ReportWindow::range(date(2026, 1, 1), date(2026, 1, 31)).unwrap();
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap());

        let single = ReportWindow::range(date(2026, 1, 5), date(2026, 1, 5)).unwrap();
        assert_eq!(single, ReportWindow::day(date(2026, 1, 5)).unwrap());
    }

    #[test]
    fn test_range_rejects_inverted_dates() {
        assert!(matches!(
            ReportWindow::range(date(2026, 2, 1), date(2026, 1, 1)),
            Err(ReportError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_trailing_days() {
        let window = ReportWindow::trailing_days(date(2026, 3, 10), 7).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap());

        assert_eq!(
            ReportWindow::trailing_days(date(2026, 3, 10), 1).unwrap(),
            ReportWindow::day(date(2026, 3, 10)).unwrap()
        );
        assert!(matches!(
            ReportWindow::trailing_days(date(2026, 3, 10), 0),
            Err(ReportError::InvalidDuration(0))
        ));
    }
}
