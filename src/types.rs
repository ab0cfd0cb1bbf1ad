use crate::DateError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE, MAX_MONTH,
    MAX_YEAR, MIN_DAY, MIN_YEAR, MONTH_NAMES, WEEKDAY_ABBREVIATIONS, WORKDAYS_PER_WEEK,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use std::num::NonZeroU8;

/// A year value guaranteed to be in the range `MIN_YEAR..=MAX_YEAR` (1..=9999)
/// Uses `NonZeroU16` internally, so 0 is not a valid year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Year 1, the first representable year
    pub const MIN: Self = Self(NonZeroU16::MIN);

    /// Creates a new Year, validating that it's non-zero and <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, DateError> {
        let non_zero = NonZeroU16::new(value).ok_or(DateError::InvalidYear(i64::from(value)))?;
        if value > MAX_YEAR {
            return Err(DateError::InvalidYear(i64::from(value)));
        }
        Ok(Self(non_zero))
    }

    /// Builds a Year from an unchecked integer.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` if the value is outside `MIN_YEAR..=MAX_YEAR`.
    pub fn from_i64(value: i64) -> Result<Self, DateError> {
        u16::try_from(value)
            .map_err(|_| DateError::InvalidYear(value))
            .and_then(Self::new)
    }

    /// Builds a Year, clamping the value into `MIN_YEAR..=MAX_YEAR`
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(MIN_YEAR), i64::from(MAX_YEAR));
        u16::try_from(clamped)
            .ok()
            .and_then(NonZeroU16::new)
            .map_or(Self::MIN, Self)
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Whether this is a Gregorian leap year
    #[inline]
    pub const fn is_leap(self) -> bool {
        is_leap_year(self.get())
    }
}

impl TryFrom<u16> for Year {
    type Error = DateError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// January
    pub const JANUARY: Self = Self(NonZeroU8::MIN);

    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, DateError> {
        let non_zero = NonZeroU8::new(value).ok_or(DateError::InvalidMonth(i64::from(value)))?;
        if value > MAX_MONTH {
            return Err(DateError::InvalidMonth(i64::from(value)));
        }
        Ok(Self(non_zero))
    }

    /// Builds a Month from an unchecked integer.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the value is outside `1..=MAX_MONTH`.
    pub fn from_i64(value: i64) -> Result<Self, DateError> {
        u8::try_from(value)
            .map_err(|_| DateError::InvalidMonth(value))
            .and_then(Self::new)
    }

    /// Builds a Month, clamping the value into `1..=MAX_MONTH`
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(1, i64::from(MAX_MONTH));
        u8::try_from(clamped)
            .ok()
            .and_then(NonZeroU8::new)
            .map_or(Self::JANUARY, Self)
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// English name of the month
    pub const fn name(self) -> &'static str {
        MONTH_NAMES[self.get() as usize]
    }

    /// Number of days this month has in `year`
    pub const fn length(self, year: Year) -> u8 {
        days_in_month(year.get(), self.get())
    }
}

impl TryFrom<u8> for Month {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day value guaranteed to be valid for a given year and month
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// The first day of any month
    pub const FIRST: Self = Self(NonZeroU8::MIN);

    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `DateError::InvalidDay` if the value is 0 or invalid for the given year and month.
    pub fn new(value: u8, year: Year, month: Month) -> Result<Self, DateError> {
        let invalid = || DateError::InvalidDay {
            year:  year.get(),
            month: month.get(),
            day:   i64::from(value),
        };

        let non_zero = NonZeroU8::new(value).ok_or_else(invalid)?;
        if value > month.length(year) {
            return Err(invalid());
        }

        Ok(Self(non_zero))
    }

    /// Builds a Day, clamping the value into `1..=` the length of the month
    pub fn clamped(value: i64, year: Year, month: Month) -> Self {
        let clamped = value.clamp(i64::from(MIN_DAY), i64::from(month.length(year)));
        u8::try_from(clamped)
            .ok()
            .and_then(NonZeroU8::new)
            .map_or(Self::FIRST, Self)
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Can't validate without year/month context, so just check minimum
        let non_zero = NonZeroU8::new(value).ok_or(DateError::InvalidDay {
            year:  0,
            month: 0,
            day:   i64::from(value),
        })?;
        Ok(Self(non_zero))
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Day of the week, Monday first as in ISO 8601
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Weekday for a zero-based offset from Monday (taken modulo 7)
    pub const fn from_monday_offset(offset: u8) -> Self {
        Self::ALL[(offset % 7) as usize]
    }

    /// Zero-based offset from Monday (Monday = 0, Sunday = 6)
    pub const fn days_from_monday(self) -> u8 {
        self as u8
    }

    /// ISO weekday number (Monday = 1, Sunday = 7)
    pub const fn number_from_monday(self) -> u8 {
        self as u8 + 1
    }

    /// Saturday or Sunday
    pub const fn is_weekend(self) -> bool {
        self.days_from_monday() >= WORKDAYS_PER_WEEK
    }

    /// Three-letter English abbreviation
    pub const fn abbreviation(self) -> &'static str {
        WEEKDAY_ABBREVIATIONS[self as usize]
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_new_valid() {
        assert!(Year::new(1).is_ok());
        assert!(Year::new(2000).is_ok());
        assert!(Year::new(9999).is_ok());
    }

    #[test]
    fn test_year_new_invalid() {
        assert!(matches!(Year::new(0), Err(DateError::InvalidYear(0))));
        assert!(matches!(Year::new(10000), Err(DateError::InvalidYear(10000))));
        assert!(matches!(Year::from_i64(-4), Err(DateError::InvalidYear(-4))));
        assert!(matches!(Year::from_i64(70_000), Err(DateError::InvalidYear(70_000))));
    }

    #[test]
    fn test_year_clamped() {
        assert_eq!(Year::clamped(-20).get(), 1);
        assert_eq!(Year::clamped(0).get(), 1);
        assert_eq!(Year::clamped(2024).get(), 2024);
        assert_eq!(Year::clamped(123_456).get(), 9999);
    }

    #[test]
    fn test_year_serde() {
        let year = Year::new(2024).unwrap();
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "2024");

        let parsed: Year = serde_json::from_str(&json).unwrap();
        assert_eq!(year, parsed);

        assert!(serde_json::from_str::<Year>("0").is_err());
    }

    #[test]
    fn test_month_new() {
        for m in 1..=12 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
        assert!(matches!(Month::new(0), Err(DateError::InvalidMonth(0))));
        assert!(matches!(Month::new(13), Err(DateError::InvalidMonth(13))));
    }

    #[test]
    fn test_month_clamped() {
        assert_eq!(Month::clamped(-3).get(), 1);
        assert_eq!(Month::clamped(0).get(), 1);
        assert_eq!(Month::clamped(7).get(), 7);
        assert_eq!(Month::clamped(13).get(), 12);
        assert_eq!(Month::clamped(i64::MAX).get(), 12);
    }

    #[test]
    fn test_month_name_and_length() {
        let leap = Year::new(2024).unwrap();
        let common = Year::new(2023).unwrap();
        let feb = Month::new(2).unwrap();

        assert_eq!(feb.name(), "February");
        assert_eq!(Month::JANUARY.name(), "January");
        assert_eq!(feb.length(leap), 29);
        assert_eq!(feb.length(common), 28);
        assert_eq!(Month::new(4).unwrap().length(common), 30);
    }

    #[test]
    fn test_day_new() {
        let y2024 = Year::new(2024).unwrap();
        let y2023 = Year::new(2023).unwrap();
        let feb = Month::new(2).unwrap();

        assert!(Day::new(28, y2023, feb).is_ok());
        assert!(Day::new(29, y2023, feb).is_err());
        assert!(Day::new(29, y2024, feb).is_ok());
        assert!(Day::new(30, y2024, feb).is_err());
        assert!(matches!(
            Day::new(0, y2024, Month::JANUARY),
            Err(DateError::InvalidDay { .. })
        ));
        assert!(matches!(
            Day::new(32, y2024, Month::JANUARY),
            Err(DateError::InvalidDay {
                year:  2024,
                month: 1,
                day:   32,
            })
        ));
    }

    #[test]
    fn test_day_clamped() {
        let y2023 = Year::new(2023).unwrap();
        let feb = Month::new(2).unwrap();

        assert_eq!(Day::clamped(31, y2023, feb).get(), 28);
        assert_eq!(Day::clamped(0, y2023, feb).get(), 1);
        assert_eq!(Day::clamped(-9, y2023, feb).get(), 1);
        assert_eq!(Day::clamped(14, y2023, feb).get(), 14);
    }

    #[test]
    fn test_day_try_from_u8() {
        let day: Day = 15.try_into().unwrap();
        assert_eq!(day.get(), 15);

        let result: Result<Day, _> = 0.try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_weekday() {
        assert_eq!(Weekday::from_monday_offset(0), Weekday::Monday);
        assert_eq!(Weekday::from_monday_offset(6), Weekday::Sunday);
        assert_eq!(Weekday::from_monday_offset(9), Weekday::Wednesday);
        assert_eq!(Weekday::Thursday.number_from_monday(), 4);
        assert_eq!(Weekday::Sunday.abbreviation(), "Sun");
        assert_eq!(Weekday::Friday.to_string(), "Friday");

        assert!(!Weekday::Friday.is_weekend());
        assert!(Weekday::Saturday.is_weekend());
        assert!(Weekday::Sunday.is_weekend());
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }
}
