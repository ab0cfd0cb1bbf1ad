use std::{cmp::Ordering, iter::FusedIterator, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, DateError, RANGE_SEPARATOR, prelude::*, weekday_of_day_number};

/// Represents a range between two dates (inclusive).
/// The start date must be less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateRange {
    start: CalendarDate,
    end:   CalendarDate,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: CalendarDate, end: CalendarDate },

    /// Error parsing date component.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from two dates given in either order
    pub fn between(a: CalendarDate, b: CalendarDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Returns the start date of the range
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    /// Returns the end date of the range
    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Returns both start and end dates as a tuple
    pub const fn dates(&self) -> (CalendarDate, CalendarDate) {
        (self.start, self.end)
    }

    /// Checks if the range contains a given date
    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// Number of days in the range, counting both ends
    pub fn day_count(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Iterates over every date in the range, both ends included
    pub fn days(&self) -> DateRangeIter {
        DateRangeIter {
            next: self.start.day_number(),
            last: self.end.day_number(),
        }
    }

    /// Walks the range day by day and counts `(weekdays, weekends)`.
    /// Both ends are included, so the two counts add up to [`day_count`](Self::day_count).
    pub fn weekday_split(&self) -> (i64, i64) {
        (self.start.day_number()..=self.end.day_number()).fold((0, 0), |(weekdays, weekends), n| {
            if weekday_of_day_number(n).is_weekend() {
                (weekdays, weekends + 1)
            } else {
                (weekdays + 1, weekends)
            }
        })
    }
}

/// Iterator over the dates of a [`DateRange`]
#[derive(Debug, Clone)]
pub struct DateRangeIter {
    next: i64,
    last: i64,
}

impl Iterator for DateRangeIter {
    type Item = CalendarDate;

    fn next(&mut self) -> Option<CalendarDate> {
        if self.next > self.last {
            return None;
        }
        let date = CalendarDate::from_day_number(self.next);
        self.next += 1;
        date
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.last - self.next + 1).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for DateRangeIter {
    fn next_back(&mut self) -> Option<CalendarDate> {
        if self.next > self.last {
            return None;
        }
        let date = CalendarDate::from_day_number(self.last);
        self.last -= 1;
        date
    }
}

impl ExactSizeIterator for DateRangeIter {}

impl FusedIterator for DateRangeIter {}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let Some((start_str, end_str)) = trimmed.split_once(RANGE_SEPARATOR) else {
            return Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            )));
        };
        if end_str.contains(RANGE_SEPARATOR) {
            return Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {}",
                trimmed.matches(RANGE_SEPARATOR).count()
            )));
        }

        let start = start_str.trim().parse::<CalendarDate>()?;
        let end = end_str.trim().parse::<CalendarDate>()?;

        Self::new(start, end)
    }
}

impl PartialOrd for DateRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateRange {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare start dates first, then end dates
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, range};

    #[test]
    fn test_new_range_cases() {
        struct TestCase {
            start:          (i64, i64, i64),
            end:            (i64, i64, i64),
            should_succeed: bool,
            description:    &'static str,
        }

        let cases = [
            TestCase {
                start:          (2024, 1, 1),
                end:            (2024, 1, 31),
                should_succeed: true,
                description:    "valid range (start < end)",
            },
            TestCase {
                start:          (2024, 1, 31),
                end:            (2024, 1, 1),
                should_succeed: false,
                description:    "invalid range (start > end)",
            },
            TestCase {
                start:          (2024, 2, 29),
                end:            (2024, 2, 29),
                should_succeed: true,
                description:    "equal dates (start == end)",
            },
        ];

        for case in &cases {
            let start = date(case.start.0, case.start.1, case.start.2);
            let end = date(case.end.0, case.end.1, case.end.2);
            let result = DateRange::new(start, end);

            if case.should_succeed {
                assert!(result.is_ok(), "Expected success for: {}", case.description);
            } else {
                assert!(result.is_err(), "Expected failure for: {}", case.description);
            }
        }
    }

    #[test]
    fn test_between_orders_dates() {
        let a = date(2024, 5, 1);
        let b = date(2023, 5, 1);
        assert_eq!(DateRange::between(a, b).dates(), (b, a));
        assert_eq!(DateRange::between(b, a).dates(), (b, a));
    }

    #[test]
    fn test_contains() {
        let january = range((2024, 1, 1), (2024, 1, 31));

        assert!(january.contains(&date(2024, 1, 1)));
        assert!(january.contains(&date(2024, 1, 31)));
        assert!(!january.contains(&date(2024, 2, 1)));
        assert!(!january.contains(&date(2023, 12, 31)));
    }

    #[test]
    fn test_days_iteration() {
        let r = range((2024, 2, 27), (2024, 3, 2));
        let days: Vec<String> = r.days().map(|d| d.to_string()).collect();
        assert_eq!(
            days,
            ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]
        );
        assert_eq!(r.days().len(), 5);
        assert_eq!(r.days().next_back(), Some(date(2024, 3, 2)));
        assert_eq!(r.day_count(), 5);
    }

    #[test]
    fn test_single_day_range() {
        let r = range((2024, 6, 8), (2024, 6, 8));
        assert_eq!(r.day_count(), 1);
        assert_eq!(r.days().collect::<Vec<_>>(), vec![date(2024, 6, 8)]);
        // 2024-06-08 is a Saturday
        assert_eq!(r.weekday_split(), (0, 1));
    }

    #[test]
    fn test_weekday_split() {
        // January 2024 starts on a Monday
        assert_eq!(range((2024, 1, 1), (2024, 1, 31)).weekday_split(), (23, 8));
        // one full week from any start day
        assert_eq!(range((2024, 1, 3), (2024, 1, 9)).weekday_split(), (5, 2));
        // Saturday through Sunday
        assert_eq!(range((2024, 1, 6), (2024, 1, 7)).weekday_split(), (0, 2));
    }

    #[test]
    fn test_parse_and_display() {
        let r: DateRange = "2024-01-01/2024-01-31".parse().unwrap();
        assert_eq!(r, range((2024, 1, 1), (2024, 1, 31)));
        assert_eq!(r.to_string(), "2024-01-01/2024-01-31");

        let err = "20240101".parse::<DateRange>().expect_err("expected error for missing range separator");
        assert!(err.to_string().contains("No range separator found"));

        let err = "2024-01-01/2024-01-02/2024-01-03"
            .parse::<DateRange>()
            .expect_err("expected error for extra separator");
        assert!(err.to_string().contains("Too many"));

        assert!(matches!(
            "2024-02-01/2024-01-01".parse::<DateRange>(),
            Err(RangeError::InvalidRange { .. })
        ));
        assert!(matches!(
            "2024-02-30/2024-03-01".parse::<DateRange>(),
            Err(RangeError::Date(DateError::InvalidDay { .. }))
        ));
    }

    #[test]
    fn test_ordering() {
        let a = range((2024, 1, 1), (2024, 1, 10));
        let b = range((2024, 1, 1), (2024, 1, 20));
        let c = range((2024, 1, 2), (2024, 1, 3));
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_serde() {
        let r = range((2024, 1, 1), (2024, 1, 31));
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#""2024-01-01/2024-01-31""#);
        let parsed: DateRange = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, r);
    }
}
