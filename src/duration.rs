//! Calendar-aware durations and day arithmetic.

use serde::Serialize;

use crate::{CalendarDate, DAYS_PER_WEEK, DateRange, IsoWeek, JANUARY, MAX_MONTH, days_in_month};

/// Error type for date arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    /// A count that must be non-negative was negative.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// The result falls outside 0001-01-01..=9999-12-31.
    #[error("Resulting date is out of range: {start} shifted by {days} days")]
    OutOfRange { start: CalendarDate, days: i64 },
}

impl CalcError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Whether a shift adds or subtracts days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Past-tense verb for messages ("added" / "subtracted")
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Forward => "added",
            Self::Backward => "subtracted",
        }
    }
}

/// Duration between two dates.
///
/// `total_days` counts the difference of the dates (one end excluded) while
/// `weekdays` and `weekends` count every day of the closed interval, so
/// `weekdays + weekends == total_days + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DurationBreakdown {
    pub total_days:     i64,
    pub years:          i64,
    pub months:         i64,
    pub days:           i64,
    pub weeks:          i64,
    pub remaining_days: i64,
    pub weekdays:       i64,
    pub weekends:       i64,
}

/// Business-day view of a period, counting both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BusinessDaysSummary {
    pub start:          CalendarDate,
    pub end:            CalendarDate,
    pub start_week:     u8,
    pub end_week:       u8,
    pub inclusive_days: i64,
    pub weekdays:       i64,
    pub weekends:       i64,
    pub weeks:          i64,
    pub remaining_days: i64,
}

/// Moves `date` by exactly `days` calendar days.
///
/// # Errors
/// `CalcError::InvalidArgument` if `days` is negative, `CalcError::OutOfRange`
/// if the result is not representable.
pub fn shift_by_days(date: CalendarDate, days: i64, direction: Direction) -> Result<CalendarDate, CalcError> {
    if days < 0 {
        return Err(CalcError::invalid(match direction {
            Direction::Forward => "Days to add must be positive",
            Direction::Backward => "Days to subtract must be positive",
        }));
    }
    shift(date, days, direction)
}

/// Moves `date` by `weeks * 7 + extra_days` calendar days.
///
/// # Errors
/// `CalcError::InvalidArgument` if either count is negative,
/// `CalcError::OutOfRange` if the result is not representable.
pub fn shift_by_weeks(
    date: CalendarDate,
    weeks: i64,
    extra_days: i64,
    direction: Direction,
) -> Result<CalendarDate, CalcError> {
    if weeks < 0 {
        return Err(CalcError::invalid("Weeks must be positive"));
    }
    if extra_days < 0 {
        return Err(CalcError::invalid("Extra days must be positive"));
    }

    let days = weeks
        .checked_mul(DAYS_PER_WEEK)
        .and_then(|d| d.checked_add(extra_days))
        .ok_or(CalcError::OutOfRange {
            start: date,
            days:  i64::MAX,
        })?;
    shift(date, days, direction)
}

fn shift(date: CalendarDate, days: i64, direction: Direction) -> Result<CalendarDate, CalcError> {
    let out_of_range = || CalcError::OutOfRange { start: date, days };
    let target = match direction {
        Direction::Forward => date.day_number().checked_add(days),
        Direction::Backward => date.day_number().checked_sub(days),
    }
    .ok_or_else(out_of_range)?;

    CalendarDate::from_day_number(target).ok_or_else(out_of_range)
}

/// Computes the duration between two dates given in either order.
pub fn duration(d1: CalendarDate, d2: CalendarDate) -> DurationBreakdown {
    let range = DateRange::between(d1, d2);
    let (earlier, later) = range.dates();

    let total_days = later - earlier;
    let (years, months, days) = calendar_breakdown(earlier, later);
    let (weekdays, weekends) = range.weekday_split();

    DurationBreakdown {
        total_days,
        years,
        months,
        days,
        weeks: total_days / DAYS_PER_WEEK,
        remaining_days: total_days % DAYS_PER_WEEK,
        weekdays,
        weekends,
    }
}

/// Years, months and days from `earlier` to `later` (`earlier <= later`).
///
/// A negative day difference borrows the month preceding `later`'s month.
/// `earlier`'s day is capped to that month's length first, so adding the
/// months with day clamping and then the days lands exactly on `later`.
fn calendar_breakdown(earlier: CalendarDate, later: CalendarDate) -> (i64, i64, i64) {
    let (ey, em, ed) = earlier.to_columns();
    let (ly, lm, ld) = later.to_columns();

    let mut years = i64::from(ly) - i64::from(ey);
    let mut months = i64::from(lm) - i64::from(em);
    if months < 0 {
        years -= 1;
        months += i64::from(MAX_MONTH);
    }

    let mut days = i64::from(ld) - i64::from(ed);
    if days < 0 {
        months -= 1;
        if months < 0 {
            years -= 1;
            months += i64::from(MAX_MONTH);
        }

        let (prev_year, prev_month) = if lm > JANUARY { (ly, lm - 1) } else { (ly - 1, MAX_MONTH) };
        let borrowed = i64::from(days_in_month(prev_year, prev_month));
        // Capped so Jan 31 to Mar 1 is 1 month 1 day rather than 1 month -2 days
        days = borrowed - i64::from(ed).min(borrowed) + i64::from(ld);
    }

    (years, months, days)
}

/// Business-day summary for the closed interval between two dates.
///
/// `inclusive_days` is `total_days + 1`: both ends count as days of the period.
pub fn business_days_summary(d1: CalendarDate, d2: CalendarDate) -> BusinessDaysSummary {
    let (start, end) = DateRange::between(d1, d2).dates();
    let breakdown = duration(start, end);

    BusinessDaysSummary {
        start,
        end,
        start_week: start.iso_week_number(),
        end_week: end.iso_week_number(),
        inclusive_days: breakdown.total_days + 1,
        weekdays: breakdown.weekdays,
        weekends: breakdown.weekends,
        weeks: breakdown.weeks,
        remaining_days: breakdown.remaining_days,
    }
}

/// Week numbers of both ends, as shown alongside a duration
pub fn iso_weeks(d1: CalendarDate, d2: CalendarDate) -> (IsoWeek, IsoWeek) {
    (d1.iso_week(), d2.iso_week())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    /// Re-applies a breakdown to `earlier`: months with day clamping, then days
    fn recombine(earlier: CalendarDate, b: &DurationBreakdown) -> CalendarDate {
        let anchor = earlier.add_months(b.years * 12 + b.months).unwrap();
        shift_by_days(anchor, b.days, Direction::Forward).unwrap()
    }

    #[test]
    fn test_duration_january_2024() {
        let b = duration(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(
            b,
            DurationBreakdown {
                total_days:     30,
                years:          0,
                months:         0,
                days:           30,
                weeks:          4,
                remaining_days: 2,
                weekdays:       23,
                weekends:       8,
            }
        );
        assert_eq!(b.weekdays + b.weekends, 31);
    }

    #[test]
    fn test_business_days_inclusive_count() {
        let s = business_days_summary(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(s.inclusive_days, 31);
        assert_eq!(s.weekdays + s.weekends, s.inclusive_days);
        assert_eq!((s.start_week, s.end_week), (1, 5));
        assert_eq!((s.weeks, s.remaining_days), (4, 2));
    }

    #[test]
    fn test_business_days_orders_dates() {
        let s = business_days_summary(date(2024, 1, 31), date(2024, 1, 1));
        assert_eq!(s.start, date(2024, 1, 1));
        assert_eq!(s.end, date(2024, 1, 31));
        assert_eq!(s.inclusive_days, 31);
    }

    #[test]
    fn test_business_days_single_day() {
        let s = business_days_summary(date(2024, 1, 5), date(2024, 1, 5));
        assert_eq!(s.inclusive_days, 1);
        assert_eq!((s.weekdays, s.weekends), (1, 0));
    }

    #[test]
    fn test_duration_is_order_independent() {
        let pairs = [
            (date(2024, 1, 1), date(2024, 1, 31)),
            (date(2020, 2, 29), date(2024, 2, 28)),
            (date(1999, 12, 31), date(2000, 3, 1)),
            (date(2023, 1, 31), date(2023, 3, 1)),
        ];
        for (a, b) in pairs {
            assert_eq!(duration(a, b), duration(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn test_duration_same_day() {
        let d = date(2024, 7, 4);
        let b = duration(d, d);
        assert_eq!((b.total_days, b.years, b.months, b.days), (0, 0, 0, 0));
        assert_eq!((b.weekdays, b.weekends), (1, 0));
    }

    #[test]
    fn test_duration_borrows_month() {
        // 2024-01-15 -> 2024-03-10: borrow February (29 days)
        let b = duration(date(2024, 1, 15), date(2024, 3, 10));
        assert_eq!((b.years, b.months, b.days), (0, 1, 24));
        assert_eq!(b.total_days, 55);
    }

    #[test]
    fn test_duration_borrows_across_year() {
        // January later date borrows December of the previous year
        let b = duration(date(2023, 11, 20), date(2024, 1, 5));
        assert_eq!((b.years, b.months, b.days), (0, 1, 16));

        let b = duration(date(2022, 3, 10), date(2024, 1, 5));
        assert_eq!((b.years, b.months, b.days), (1, 9, 26));
    }

    #[test]
    fn test_duration_whole_years() {
        let b = duration(date(2020, 2, 29), date(2024, 2, 29));
        assert_eq!((b.years, b.months, b.days), (4, 0, 0));
        assert_eq!(b.total_days, 1461);
    }

    #[test]
    fn test_duration_end_of_month_earlier_day() {
        // January 31st borrowing a 28-day February
        let b = duration(date(2023, 1, 31), date(2023, 3, 1));
        assert_eq!((b.years, b.months, b.days), (0, 1, 1));
        assert_eq!(b.total_days, 29);
    }

    #[test]
    fn test_duration_recombines_exactly() {
        let dates = [
            date(2023, 1, 31),
            date(2023, 2, 28),
            date(2023, 3, 1),
            date(2024, 1, 30),
            date(2024, 2, 29),
            date(2024, 3, 31),
            date(2024, 12, 31),
            date(2025, 5, 15),
        ];
        for &a in &dates {
            for &b in &dates {
                let (earlier, later) = DateRange::between(a, b).dates();
                let breakdown = duration(a, b);
                assert!((0..12).contains(&breakdown.months), "{a} / {b}");
                assert!(breakdown.days >= 0, "{a} / {b}");
                assert_eq!(recombine(earlier, &breakdown), later, "{a} / {b}");
            }
        }
    }

    #[test]
    fn test_duration_invariants_over_many_spans() {
        let start = date(2023, 12, 25);
        for offset in 0..800 {
            let end = shift_by_days(start, offset, Direction::Forward).unwrap();
            let b = duration(start, end);
            assert_eq!(b.total_days, offset);
            assert_eq!(b.weekdays + b.weekends, b.total_days + 1);
            assert_eq!(b.weeks * 7 + b.remaining_days, b.total_days);
        }
    }

    #[test]
    fn test_shift_forward_across_leap_day() {
        let result = shift_by_days(date(2024, 2, 28), 2, Direction::Forward).unwrap();
        assert_eq!(result, date(2024, 3, 1));

        let result = shift_by_days(date(2023, 2, 28), 1, Direction::Forward).unwrap();
        assert_eq!(result, date(2023, 3, 1));
    }

    #[test]
    fn test_shift_backward() {
        let result = shift_by_days(date(2024, 1, 1), 1, Direction::Backward).unwrap();
        assert_eq!(result, date(2023, 12, 31));

        let result = shift_by_days(date(2024, 3, 1), 366, Direction::Backward).unwrap();
        assert_eq!(result, date(2023, 3, 1));
    }

    #[test]
    fn test_shift_zero_is_identity() {
        let d = date(2024, 5, 5);
        assert_eq!(shift_by_days(d, 0, Direction::Forward), Ok(d));
        assert_eq!(shift_by_days(d, 0, Direction::Backward), Ok(d));
    }

    #[test]
    fn test_shift_rejects_negative() {
        let d = date(2024, 5, 5);
        let err = shift_by_days(d, -1, Direction::Forward).unwrap_err();
        assert!(matches!(err, CalcError::InvalidArgument { .. }));
        assert_eq!(err.to_string(), "Days to add must be positive");

        let err = shift_by_days(d, -1, Direction::Backward).unwrap_err();
        assert_eq!(err.to_string(), "Days to subtract must be positive");
    }

    #[test]
    fn test_shift_round_trip() {
        let dates = [date(1, 1, 1), date(1900, 2, 28), date(2024, 2, 29), date(9999, 12, 31)];
        for d in dates {
            for n in [0, 1, 27, 365, 1461] {
                let Ok(forward) = shift_by_days(d, n, Direction::Forward) else {
                    continue;
                };
                assert_eq!(shift_by_days(forward, n, Direction::Backward), Ok(d), "{d} +/- {n}");
            }
        }
    }

    #[test]
    fn test_shift_out_of_range() {
        assert!(matches!(
            shift_by_days(date(9999, 12, 31), 1, Direction::Forward),
            Err(CalcError::OutOfRange { .. })
        ));
        assert!(matches!(
            shift_by_days(date(1, 1, 1), 1, Direction::Backward),
            Err(CalcError::OutOfRange { .. })
        ));
        assert!(matches!(
            shift_by_days(date(2024, 1, 1), i64::MAX, Direction::Forward),
            Err(CalcError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_shift_by_weeks() {
        let d = date(2024, 1, 1);
        assert_eq!(shift_by_weeks(d, 2, 3, Direction::Forward), Ok(date(2024, 1, 18)));
        assert_eq!(shift_by_weeks(d, 1, 0, Direction::Backward), Ok(date(2023, 12, 25)));
        assert_eq!(
            shift_by_weeks(d, 2, 3, Direction::Forward),
            shift_by_days(d, 17, Direction::Forward)
        );
    }

    #[test]
    fn test_shift_by_weeks_rejects_negative() {
        let d = date(2024, 1, 1);
        let err = shift_by_weeks(d, -1, 0, Direction::Forward).unwrap_err();
        assert_eq!(err.to_string(), "Weeks must be positive");

        let err = shift_by_weeks(d, 1, -2, Direction::Backward).unwrap_err();
        assert_eq!(err.to_string(), "Extra days must be positive");

        assert!(matches!(
            shift_by_weeks(d, i64::MAX, 0, Direction::Forward),
            Err(CalcError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_iso_weeks_of_pair() {
        let (a, b) = iso_weeks(date(2021, 1, 1), date(2021, 1, 4));
        assert_eq!((a.year, a.week), (2020, 53));
        assert_eq!((b.year, b.week), (2021, 1));
    }
}
