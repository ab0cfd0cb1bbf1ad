//! Shared helpers for unit tests.

use crate::{CalendarDate, DateRange};

/// Strictly constructed date, panicking on invalid input
pub fn date(year: i64, month: i64, day: i64) -> CalendarDate {
    CalendarDate::new(year, month, day).unwrap_or_else(|e| panic!("invalid test date {year}-{month}-{day}: {e}"))
}

/// Inclusive range between two strictly constructed dates
pub fn range(start: (i64, i64, i64), end: (i64, i64, i64)) -> DateRange {
    DateRange::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2))
        .unwrap_or_else(|e| panic!("invalid test range: {e}"))
}
