//! Command-line definitions.
//!
//! Numbers are taken as text so that unparsable input can fall back to
//! defaults the way the calculator fields do. Negative numbers are accepted
//! as values and rejected or clamped later by the date arithmetic.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Almanac - calendar, date calculators and date-keyed notes.
#[derive(Debug, Parser)]
#[command(name = "almanac")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ALMANAC_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Reject out-of-range days and months instead of clamping them
    #[arg(long, global = true)]
    pub strict: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show a month grid (defaults to the current month)
    Month(MonthArgs),

    /// Weekday and week number of a date
    Weekday(DateArgs),

    /// Add days to a date
    AddDays(ShiftDaysArgs),

    /// Subtract days from a date
    SubDays(ShiftDaysArgs),

    /// Add weeks (and extra days) to a date
    AddWeeks(ShiftWeeksArgs),

    /// Subtract weeks (and extra days) from a date
    SubWeeks(ShiftWeeksArgs),

    /// Duration between two dates
    Duration(DatePairArgs),

    /// Business and weekend days between two dates, both included
    BusinessDays(DatePairArgs),

    /// ISO week of a date and its Monday-Sunday period
    Week(DateArgs),

    /// Manage events
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },
}

/// A date given as separate day, month and year fields
#[derive(Debug, Args)]
pub struct DateArgs {
    #[arg(allow_negative_numbers = true)]
    pub day:   String,
    #[arg(allow_negative_numbers = true)]
    pub month: String,
    #[arg(allow_negative_numbers = true)]
    pub year:  String,
}

#[derive(Debug, Args)]
pub struct ShiftDaysArgs {
    #[command(flatten)]
    pub date: DateArgs,

    /// Number of days
    #[arg(allow_negative_numbers = true)]
    pub days: String,
}

#[derive(Debug, Args)]
pub struct ShiftWeeksArgs {
    #[command(flatten)]
    pub date: DateArgs,

    /// Number of weeks
    #[arg(default_value = "1", allow_negative_numbers = true)]
    pub weeks: String,

    /// Extra days on top of the weeks
    #[arg(default_value = "0", allow_negative_numbers = true)]
    pub extra_days: String,
}

#[derive(Debug, Args)]
pub struct DatePairArgs {
    #[arg(allow_negative_numbers = true)]
    pub day1:   String,
    #[arg(allow_negative_numbers = true)]
    pub month1: String,
    #[arg(allow_negative_numbers = true)]
    pub year1:  String,
    #[arg(allow_negative_numbers = true)]
    pub day2:   String,
    #[arg(allow_negative_numbers = true)]
    pub month2: String,
    #[arg(allow_negative_numbers = true)]
    pub year2:  String,
}

#[derive(Debug, Args)]
pub struct MonthArgs {
    #[arg(allow_negative_numbers = true)]
    pub year:  Option<String>,
    #[arg(allow_negative_numbers = true)]
    pub month: Option<String>,

    /// Show the previous month
    #[arg(long, group = "nav")]
    pub prev: bool,

    /// Show the next month
    #[arg(long, group = "nav")]
    pub next: bool,

    /// Show the same month a year earlier
    #[arg(long, group = "nav")]
    pub prev_year: bool,

    /// Show the same month a year later
    #[arg(long, group = "nav")]
    pub next_year: bool,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Add an event to a date (YYYY-MM-DD)
    Add {
        date: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List the events of a date
    List { date: String },

    /// List every event, newest first
    All,

    /// Delete the event at a 1-based position on a date
    Delete { date: String, index: usize },

    /// Delete the first event on a date with exactly this text
    Remove {
        date: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}
