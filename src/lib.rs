//! Proleptic Gregorian calendar arithmetic.
//!
//! [`CalendarDate`] is built from raw integers by clamping them into a real date
//! ([`CalendarDate::normalize`]), or strictly with [`CalendarDate::new`]. The
//! [`duration`] module computes calendar-aware durations, business-day counts and
//! day/week shifts, [`month`] lays out month grids and [`events`] persists
//! free-text notes keyed by date.

mod consts;
mod prelude;
mod range;
mod types;

pub mod config;
pub mod duration;
pub mod events;
pub mod input;
pub mod month;
pub mod report;

#[cfg(test)]
mod test_utils;

pub use consts::*;
pub use duration::{BusinessDaysSummary, CalcError, Direction, DurationBreakdown};
pub use events::{DatedEvent, EventError, EventOverview, EventRecord, EventStats, EventStore};
pub use month::MonthView;
pub use range::{DateRange, DateRangeIter, RangeError};
pub use types::{Day, Month, Weekday, Year, days_in_month, is_leap_year};

use crate::prelude::*;
use chrono::Datelike;
use std::ops::Sub;
use std::str::FromStr;

/// A real date of the proleptic Gregorian calendar between 0001-01-01 and
/// 9999-12-31.
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i64),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(i64),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: i64 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

/// An ISO-8601 week: the week-owning year and the week number (1..=53).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{year}-W{week:02}")]
pub struct IsoWeek {
    pub year: i64,
    pub week: u8,
}

impl CalendarDate {
    /// 0001-01-01, the earliest representable date
    pub const MIN: Self = Self {
        year:  Year::MIN,
        month: Month::JANUARY,
        day:   Day::FIRST,
    };

    /// Strictly builds a date, rejecting any out-of-range component.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear`, `InvalidMonth` or `InvalidDay` for the
    /// first component that does not fit.
    pub fn new(year: i64, month: i64, day: i64) -> Result<Self, DateError> {
        let year = Year::from_i64(year)?;
        let month = Month::from_i64(month)?;
        let day = u8::try_from(day)
            .map_err(|_| DateError::InvalidDay {
                year: year.get(),
                month: month.get(),
                day,
            })
            .and_then(|d| Day::new(d, year, month))?;
        Ok(Self { year, month, day })
    }

    /// Builds a date from already validated components.
    ///
    /// # Errors
    /// Returns `DateError::InvalidDay` if `day` does not exist in that month.
    pub fn from_parts(year: Year, month: Month, day: Day) -> Result<Self, DateError> {
        let day = Day::new(day.get(), year, month)?;
        Ok(Self { year, month, day })
    }

    /// Builds a date from raw integers, clamping the month into `1..=12` and the
    /// day into the length of that month.
    ///
    /// Out-of-range input never errors: `(2023, 2, 31)` becomes 2023-02-28. When
    /// the year itself is not representable the current local date is returned.
    pub fn normalize(year: i64, month: i64, day: i64) -> Self {
        Self::try_normalize(year, month, day).unwrap_or_else(|| {
            log::warn!("year {year} is out of range, falling back to today");
            Self::today()
        })
    }

    /// Clamping constructor without the "today" fallback.
    /// Returns `None` when the year is outside `MIN_YEAR..=MAX_YEAR`.
    pub fn try_normalize(year: i64, month: i64, day: i64) -> Option<Self> {
        let year = Year::from_i64(year).ok()?;
        let clamped_month = Month::clamped(month);
        let clamped_day = Day::clamped(day, year, clamped_month);

        if i64::from(clamped_month.get()) != month || i64::from(clamped_day.get()) != day {
            log::debug!(
                "clamped {year}-{month}-{day} to {year}-{:02}-{:02}",
                clamped_month.get(),
                clamped_day.get()
            );
        }

        Some(Self {
            year,
            month: clamped_month,
            day: clamped_day,
        })
    }

    /// The 1st of a month
    pub const fn first_of_month(year: Year, month: Month) -> Self {
        Self {
            year,
            month,
            day: Day::FIRST,
        }
    }

    /// The last day of a month
    pub fn last_of_month(year: Year, month: Month) -> Self {
        let day = Day::clamped(i64::from(month.length(year)), year, month);
        Self { year, month, day }
    }

    /// The current local date
    pub fn today() -> Self {
        let now = chrono::Local::now().date_naive();
        Self::new(i64::from(now.year()), i64::from(now.month()), i64::from(now.day())).unwrap_or(Self::MIN)
    }

    /// Returns the year component
    pub const fn year(&self) -> Year {
        self.year
    }

    /// Returns the month component
    pub const fn month(&self) -> Month {
        self.month
    }

    /// Returns the day component
    pub const fn day(&self) -> Day {
        self.day
    }

    /// Day of the year, 1-based
    pub fn ordinal(&self) -> u16 {
        let leap_shift = u16::from(self.month.get() > FEBRUARY && self.year.is_leap());
        DAYS_BEFORE_MONTH[usize::from(self.month.get())] + u16::from(self.day.get()) + leap_shift
    }

    /// Days since 1970-01-01 (negative before it)
    pub fn day_number(&self) -> i64 {
        days_from_civil(i64::from(self.year.get()), self.month.get(), self.day.get())
    }

    /// Inverse of [`day_number`](Self::day_number).
    /// Returns `None` when the day falls outside the representable years.
    pub fn from_day_number(days: i64) -> Option<Self> {
        let (year, month, day) = civil_from_days(days)?;
        Self::new(year, i64::from(month), i64::from(day)).ok()
    }

    pub fn weekday(&self) -> Weekday {
        weekday_of_day_number(self.day_number())
    }

    /// ISO-8601 week of this date, which may belong to the previous or next year.
    pub fn iso_week(&self) -> IsoWeek {
        let year = i64::from(self.year.get());
        let weekday = i64::from(self.weekday().number_from_monday());
        let week = (i64::from(self.ordinal()) - weekday + 10) / DAYS_PER_WEEK;

        if week < 1 {
            IsoWeek {
                year: year - 1,
                week: iso_weeks_in_year(year - 1),
            }
        } else if week > i64::from(iso_weeks_in_year(year)) {
            IsoWeek { year: year + 1, week: 1 }
        } else {
            IsoWeek {
                year,
                week: u8::try_from(week).unwrap_or(1),
            }
        }
    }

    /// ISO-8601 week number (1..=53)
    pub fn iso_week_number(&self) -> u8 {
        self.iso_week().week
    }

    /// Monday and Sunday of this date's week.
    /// Returns `None` if either lies outside the representable range.
    pub fn week_span(&self) -> Option<(Self, Self)> {
        let monday = self.day_number() - i64::from(self.weekday().days_from_monday());
        Some((Self::from_day_number(monday)?, Self::from_day_number(monday + 6)?))
    }

    /// Shifts by `months` calendar months, clamping the day to the target
    /// month's length (2024-01-31 plus one month is 2024-02-29).
    pub fn add_months(&self, months: i64) -> Option<Self> {
        let index = i64::from(self.year.get())
            .checked_mul(12)?
            .checked_add(i64::from(self.month.get()) - 1)?
            .checked_add(months)?;
        let year = Year::from_i64(index.div_euclid(12)).ok()?;
        let month = Month::clamped(index.rem_euclid(12) + 1);
        let day = Day::clamped(i64::from(self.day.get()), year, month);
        Some(Self { year, month, day })
    }

    /// Dates as `(year, month, day)` integers
    pub const fn to_columns(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }
}

/// Signed number of days from `rhs` to `self`
impl Sub for CalendarDate {
    type Output = i64;

    fn sub(self, rhs: Self) -> i64 {
        self.day_number() - rhs.day_number()
    }
}

// --- civil day numbering ---

const DAYS_IN_400Y: i64 = 146_097;
/// Days from 0000-03-01 to 1970-01-01
const EPOCH_SHIFT: i64 = 719_468;

pub(crate) fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let year = if month <= FEBRUARY { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year.rem_euclid(400);
    // March-based month so the leap day is last
    let shifted_month = (i64::from(month) + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_IN_400Y + day_of_era - EPOCH_SHIFT
}

fn civil_from_days(days: i64) -> Option<(i64, u8, u8)> {
    let days = days.checked_add(EPOCH_SHIFT)?;
    let era = days.div_euclid(DAYS_IN_400Y);
    let day_of_era = days.rem_euclid(DAYS_IN_400Y);
    let year_of_era = (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = u8::try_from(day_of_year - (153 * shifted_month + 2) / 5 + 1).ok()?;
    let month = u8::try_from(if shifted_month < 10 { shifted_month + 3 } else { shifted_month - 9 }).ok()?;
    let year = era.checked_mul(400)?.checked_add(year_of_era)?;
    Some((if month <= FEBRUARY { year + 1 } else { year }, month, day))
}

/// 1970-01-01 was a Thursday
pub(crate) fn weekday_of_day_number(days: i64) -> Weekday {
    let offset = (days + 3).rem_euclid(DAYS_PER_WEEK);
    Weekday::from_monday_offset(u8::try_from(offset).unwrap_or(0))
}

/// 53 when January 1st is a Thursday, or a Wednesday in a leap year
fn iso_weeks_in_year(year: i64) -> u8 {
    let jan1 = weekday_of_day_number(days_from_civil(year, JANUARY, MIN_DAY));
    let leap = u16::try_from(year).is_ok_and(is_leap_year);
    match jan1 {
        Weekday::Thursday => 53,
        Weekday::Wednesday if leap => 53,
        _ => 52,
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(DateError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, got {trimmed}"
            )));
        };

        Self::new(parse_component(year)?, parse_component(month)?, parse_component(day)?)
    }
}

/// Helper to parse a numeric component with better error messages
fn parse_component(s: &str) -> Result<i64, DateError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::InvalidFormat(s.to_owned()));
    }
    s.parse::<i64>()
        .map_err(|_| DateError::InvalidFormat(s.to_owned()))
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
