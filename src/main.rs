//! almanac - calendar, date calculators and date-keyed notes.

mod cli;

use std::process::ExitCode;

use almanac::config::{Config, ConfigError};
use almanac::duration::{self, CalcError, Direction};
use almanac::input::{InputError, required_count, spin_value};
use almanac::{CalendarDate, DateError, EventError, EventStore, MonthView, report};
use clap::Parser;
use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};
use serde::Serialize;
use serde_json::json;

use crate::cli::{Cli, Command, DateArgs, DatePairArgs, EventsCommand, MonthArgs, ShiftDaysArgs, ShiftWeeksArgs};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Logger error: {0}")]
    Logger(#[from] FlexiLoggerError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

type Result<T> = std::result::Result<T, CliError>;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(config: &Config, verbose: u8) -> Result<LoggerHandle> {
    let level = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        _ => "debug",
    };
    Ok(Logger::try_with_env_or_str(level)?.log_to_stderr().start()?)
}

/// Turns raw day/month/year fields into a date
struct DateReader {
    strict: bool,
    today:  CalendarDate,
}

impl DateReader {
    fn read(&self, args: &DateArgs) -> Result<CalendarDate> {
        let year = spin_value(&args.year, i64::from(self.today.year().get()));
        let month = spin_value(&args.month, 1);
        let day = spin_value(&args.day, 1);

        if self.strict {
            Ok(CalendarDate::new(year, month, day)?)
        } else {
            Ok(CalendarDate::normalize(year, month, day))
        }
    }

    fn read_pair(&self, args: &DatePairArgs) -> Result<(CalendarDate, CalendarDate)> {
        let first = DateArgs {
            day:   args.day1.clone(),
            month: args.month1.clone(),
            year:  args.year1.clone(),
        };
        let second = DateArgs {
            day:   args.day2.clone(),
            month: args.month2.clone(),
            year:  args.year2.clone(),
        };
        Ok((self.read(&first)?, self.read(&second)?))
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text())
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = Config::load(cli.config.as_deref())?;
    let _logger = init_logger(&config, cli.verbose)?;
    log::debug!("using events file {}", config.events_file.display());

    execute(cli, &config)
}

fn execute(cli: Cli, config: &Config) -> Result<String> {
    let reader = DateReader {
        strict: cli.strict || config.strict_dates,
        today:  CalendarDate::today(),
    };
    let store = EventStore::new(&config.events_file);
    let json = cli.json;

    match cli.command {
        Command::Month(args) => month(&args, &reader, &store, json),
        Command::Weekday(args) => {
            let date = reader.read(&args)?;
            let value = json!({
                "date": date,
                "weekday": date.weekday().to_string(),
                "iso_week": date.iso_week().to_string(),
            });
            emit(json, &value, || report::weekday(date))
        }
        Command::AddDays(args) => shift_days(&args, Direction::Forward, &reader, json),
        Command::SubDays(args) => shift_days(&args, Direction::Backward, &reader, json),
        Command::AddWeeks(args) => shift_weeks(&args, Direction::Forward, &reader, json),
        Command::SubWeeks(args) => shift_weeks(&args, Direction::Backward, &reader, json),
        Command::Duration(args) => {
            let (d1, d2) = reader.read_pair(&args)?;
            let breakdown = duration::duration(d1, d2);
            emit(json, &breakdown, || report::duration(d1, d2, &breakdown))
        }
        Command::BusinessDays(args) => {
            let (d1, d2) = reader.read_pair(&args)?;
            let summary = duration::business_days_summary(d1, d2);
            emit(json, &summary, || report::business_days(&summary))
        }
        Command::Week(args) => {
            let date = reader.read(&args)?;
            let (monday, sunday) = date
                .week_span()
                .map_or((None, None), |(m, s)| (Some(m), Some(s)));
            let value = json!({
                "date": date,
                "iso_week": date.iso_week().to_string(),
                "monday": monday,
                "sunday": sunday,
            });
            emit(json, &value, || report::week_info(date))
        }
        Command::Events { command } => events(command, &store, json),
    }
}

fn month(args: &MonthArgs, reader: &DateReader, store: &EventStore, json: bool) -> Result<String> {
    let today = reader.today;
    let year = spin_value(args.year.as_deref().unwrap_or_default(), i64::from(today.year().get()));
    let month = spin_value(args.month.as_deref().unwrap_or_default(), i64::from(today.month().get()));

    let mut view = MonthView::new(year, month);
    if args.prev {
        view = view.prev_month();
    } else if args.next {
        view = view.next_month();
    } else if args.prev_year {
        view = view.prev_year();
    } else if args.next_year {
        view = view.next_year();
    }

    let event_days = store.dates_with_events(&view.range());
    let value = json!({
        "title": view.title(),
        "weeks": view.weeks(),
        "event_days": event_days,
    });
    emit(json, &value, || report::month_grid(&view, today, &event_days))
}

fn shift_days(args: &ShiftDaysArgs, direction: Direction, reader: &DateReader, json: bool) -> Result<String> {
    let date = reader.read(&args.date)?;
    let days = required_count(&args.days, "Days")?;
    let result = duration::shift_by_days(date, days, direction)?;

    let value = json!({ "original": date, "result": result, "days": days });
    emit(json, &value, || report::shifted_by_days(result, days, direction))
}

fn shift_weeks(args: &ShiftWeeksArgs, direction: Direction, reader: &DateReader, json: bool) -> Result<String> {
    let date = reader.read(&args.date)?;
    let weeks = spin_value(&args.weeks, 1);
    let extra_days = spin_value(&args.extra_days, 0);
    let result = duration::shift_by_weeks(date, weeks, extra_days, direction)?;

    let value = json!({
        "original": date,
        "result": result,
        "weeks": weeks,
        "extra_days": extra_days,
    });
    emit(json, &value, || report::shifted_by_weeks(date, result, weeks, extra_days, direction))
}

fn events(command: EventsCommand, store: &EventStore, json: bool) -> Result<String> {
    match command {
        EventsCommand::Add { date, text } => {
            let date: CalendarDate = date.parse()?;
            let id = store.add(date, &text.join(" "))?;
            Ok(format!("Added event #{id} on {date}"))
        }
        EventsCommand::List { date } => {
            let date: CalendarDate = date.parse()?;
            let events = store.list(date);
            emit(json, &events, || report::event_list(date, &events))
        }
        EventsCommand::All => {
            let overview = store.overview();
            emit(json, &overview, || report::all_events(overview.stats, &overview.events))
        }
        EventsCommand::Delete { date, index } => {
            let date: CalendarDate = date.parse()?;
            let position = index
                .checked_sub(1)
                .ok_or_else(|| CliError::InvalidInput("event numbers start at 1".to_owned()))?;
            let removed = store.delete(date, position)?;
            Ok(format!("Deleted \"{}\" from {date}", removed.text))
        }
        EventsCommand::Remove { date, text } => {
            let date: CalendarDate = date.parse()?;
            let removed = store.delete_matching(date, &text.join(" "))?;
            Ok(format!("Deleted \"{}\" from {date}", removed.text))
        }
    }
}
