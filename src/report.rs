//! Human-readable rendering of calculator results.

use std::fmt::Write;

use crate::duration::iso_weeks;
use crate::{
    BusinessDaysSummary, CalendarDate, DatedEvent, Direction, DurationBreakdown, EventRecord, EventStats, MonthView,
    WEEKDAY_ABBREVIATIONS,
};

/// "January 05, 2024"
pub fn long_date(date: CalendarDate) -> String {
    format!("{} {:02}, {}", date.month().name(), date.day().get(), date.year())
}

/// "Friday, January 05, 2024"
pub fn full_date(date: CalendarDate) -> String {
    format!("{}, {}", date.weekday(), long_date(date))
}

/// "05/01/2024"
pub fn short_date(date: CalendarDate) -> String {
    format!("{:02}/{:02}/{}", date.day().get(), date.month().get(), date.year())
}

pub fn weekday(date: CalendarDate) -> String {
    format!(
        "{} is a {}\nWeek {} of {}",
        long_date(date),
        date.weekday(),
        date.iso_week_number(),
        date.year()
    )
}

pub fn shifted_by_days(result: CalendarDate, days: i64, direction: Direction) -> String {
    format!(
        "New date: {}\nWeek {} of {}\n({days} days {})",
        full_date(result),
        result.iso_week_number(),
        result.year(),
        direction.verb()
    )
}

pub fn shifted_by_weeks(
    original: CalendarDate,
    result: CalendarDate,
    weeks: i64,
    extra_days: i64,
    direction: Direction,
) -> String {
    let mut operation = match direction {
        Direction::Forward => format!("Added {weeks} weeks"),
        Direction::Backward => format!("Subtracted {weeks} weeks"),
    };
    if extra_days > 0 {
        let _ = write!(operation, " and {extra_days} days");
    }

    format!(
        "{operation}\nOriginal date: {} (Week {})\nNew date: {} (Week {})",
        long_date(original),
        original.iso_week_number(),
        full_date(result),
        result.iso_week_number()
    )
}

pub fn duration(d1: CalendarDate, d2: CalendarDate, b: &DurationBreakdown) -> String {
    let (w1, w2) = iso_weeks(d1, d2);
    format!(
        "Duration between {} and {}:\n\n\
         Week {} of {} → Week {} of {}\n\
         • {} total days\n\
         • {} years, {} months, {} days\n\
         • {} weeks and {} days\n\
         • {} weekdays\n\
         • {} weekend days",
        short_date(d1),
        short_date(d2),
        w1.week,
        d1.year(),
        w2.week,
        d2.year(),
        b.total_days,
        b.years,
        b.months,
        b.days,
        b.weeks,
        b.remaining_days,
        b.weekdays,
        b.weekends
    )
}

pub fn business_days(s: &BusinessDaysSummary) -> String {
    format!(
        "Business Days Calculation:\n\n\
         • Period: {} (Week {}) to {} (Week {})\n\
         • Total days: {}\n\
         • Business days: {}\n\
         • Weekend days: {}\n\
         • Duration: {} weeks, {} days",
        short_date(s.start),
        s.start_week,
        short_date(s.end),
        s.end_week,
        s.inclusive_days,
        s.weekdays,
        s.weekends,
        s.weeks,
        s.remaining_days
    )
}

/// Week number and the Monday-Sunday period around `date`
pub fn week_info(date: CalendarDate) -> String {
    let week = date.iso_week_number();
    let period = date.week_span().map_or_else(
        || "outside the supported calendar".to_owned(),
        |(monday, sunday)| {
            format!(
                "{} {:02} - {}",
                monday.month().name(),
                monday.day().get(),
                long_date(sunday)
            )
        },
    );

    format!(
        "Week Information:\n\n\
         • Date: {}\n\
         • Week {week} of {}\n\
         • Week period: {period}\n\
         • Days in week {week}: 7",
        full_date(date),
        date.year()
    )
}

/// Month grid, Monday first. `today` is bracketed and days with events carry
/// a `*`.
pub fn month_grid(view: &MonthView, today: CalendarDate, event_days: &[CalendarDate]) -> String {
    let mut out = String::new();
    let header: String = WEEKDAY_ABBREVIATIONS.iter().map(|a| format!("{a:>4} ")).collect();

    let _ = writeln!(out, "{:^width$}", view.title(), width = header.len());
    let _ = writeln!(out, "{}", header.trim_end());

    for week in view.weeks() {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                None => "     ".to_owned(),
                Some(d) if *d == today => format!(" [{:>2}]", d.day().get()),
                Some(d) if event_days.contains(d) => format!("{:>4}*", d.day().get()),
                Some(d) => format!("{:>4} ", d.day().get()),
            })
            .collect();
        let _ = writeln!(out, "{}", row.trim_end());
    }

    out.push_str("[ ] today   * has events");
    out
}

pub fn event_list(date: CalendarDate, events: &[EventRecord]) -> String {
    if events.is_empty() {
        return format!("No events for {}", long_date(date));
    }

    let mut out = format!("Events for {}:", long_date(date));
    for event in events {
        let _ = write!(out, "\n{:>3}. {}", event.id, event.text);
    }
    out
}

pub fn all_events(stats: EventStats, events: &[DatedEvent]) -> String {
    let mut out = format!(
        "Statistics:\n• Total events: {}\n• Dates with events: {}",
        stats.total_events, stats.dates_with_events
    );

    if events.is_empty() {
        out.push_str("\n\nNo events yet!");
        return out;
    }

    let _ = write!(out, "\n\n{:<12} {:<45} {}", "Date", "Event", "Added");
    for event in events {
        let _ = write!(
            out,
            "\n{:<12} {:<45} {}",
            event.date.to_string(),
            event.record.text,
            event.record.created_at.format("%H:%M")
        );
    }
    out
}
