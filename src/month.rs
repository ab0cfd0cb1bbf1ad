//! Month grid layout and month/year navigation.

use crate::{CalendarDate, DECEMBER, DateRange, JANUARY, MAX_YEAR, MIN_YEAR, Month, Year, prelude::*};

/// A displayed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{} {}", "month.name()", "year.get()")]
pub struct MonthView {
    year:  Year,
    month: Month,
}

/// One row of the grid, Monday first; days outside the month are `None`
pub type Week = [Option<CalendarDate>; 7];

impl MonthView {
    /// Builds a view, clamping the year into `MIN_YEAR..=MAX_YEAR` and the
    /// month into `1..=12`.
    pub fn new(year: i64, month: i64) -> Self {
        Self {
            year:  Year::clamped(year),
            month: Month::clamped(month),
        }
    }

    /// The month containing `date`
    pub const fn containing(date: CalendarDate) -> Self {
        Self {
            year:  date.year(),
            month: date.month(),
        }
    }

    pub const fn year(&self) -> Year {
        self.year
    }

    pub const fn month(&self) -> Month {
        self.month
    }

    /// "January 2024"
    pub fn title(&self) -> String {
        self.to_string()
    }

    pub const fn first_day(&self) -> CalendarDate {
        CalendarDate::first_of_month(self.year, self.month)
    }

    pub fn last_day(&self) -> CalendarDate {
        CalendarDate::last_of_month(self.year, self.month)
    }

    /// Every date of the month
    pub fn range(&self) -> DateRange {
        DateRange::between(self.first_day(), self.last_day())
    }

    /// Rows of the month grid. The first row starts on the Monday on or before
    /// the 1st; rows without a day of this month are never produced.
    pub fn weeks(&self) -> Vec<Week> {
        let lead = usize::from(self.first_day().weekday().days_from_monday());
        let mut weeks = Vec::with_capacity(6);
        let mut week: Week = [None; 7];
        let mut column = lead;

        for date in self.range().days() {
            week[column] = Some(date);
            column += 1;
            if column == week.len() {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(week);
        }

        debug_assert!(weeks.len() <= 6);
        weeks
    }

    /// Previous month; stays put at January of `MIN_YEAR`
    pub fn prev_month(&self) -> Self {
        match self.month.get() {
            JANUARY if self.year.get() == MIN_YEAR => *self,
            JANUARY => Self::new(i64::from(self.year.get()) - 1, i64::from(DECEMBER)),
            m => Self::new(i64::from(self.year.get()), i64::from(m) - 1),
        }
    }

    /// Next month; stays put at December of `MAX_YEAR`
    pub fn next_month(&self) -> Self {
        match self.month.get() {
            DECEMBER if self.year.get() == MAX_YEAR => *self,
            DECEMBER => Self::new(i64::from(self.year.get()) + 1, i64::from(JANUARY)),
            m => Self::new(i64::from(self.year.get()), i64::from(m) + 1),
        }
    }

    /// Same month one year earlier (saturating)
    pub fn prev_year(&self) -> Self {
        Self::new(i64::from(self.year.get()) - 1, i64::from(self.month.get()))
    }

    /// Same month one year later (saturating)
    pub fn next_year(&self) -> Self {
        Self::new(i64::from(self.year.get()) + 1, i64::from(self.month.get()))
    }
}
