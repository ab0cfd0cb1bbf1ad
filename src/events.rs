//! Free-text events persisted in a JSON file, keyed by date.
//!
//! The file maps `YYYY-MM-DD` keys to lists of records:
//!
//! ```json
//! {
//!     "2024-01-15": [
//!         { "id": 1, "text": "Dentist", "created_at": "2024-01-10 09:30" }
//!     ]
//! }
//! ```
//!
//! Every operation reloads the file. A missing, blank or unparsable file reads
//! as an empty store; invalid dates and malformed records are skipped one by one.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{CalendarDate, DateRange};

/// Default file name of the event store
pub const EVENTS_FILE_NAME: &str = "calendar_events.json";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const JSON_INDENT: &[u8] = b"    ";

type EventMap = BTreeMap<CalendarDate, Vec<EventRecord>>;

/// A note attached to a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 1-based position within its date
    pub id:         u32,
    pub text:       String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// An event together with the date it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedEvent {
    pub date:   CalendarDate,
    #[serde(flatten)]
    pub record: EventRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EventStats {
    pub total_events:      usize,
    pub dates_with_events: usize,
}

/// Everything `events all` shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOverview {
    pub stats:  EventStats,
    pub events: Vec<DatedEvent>,
}

/// Error type for event store operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Event text is empty")]
    EmptyText,

    #[error("No event #{} on {date}", .index + 1)]
    NotFound { date: CalendarDate, index: usize },

    #[error("No event \"{text}\" on {date}")]
    NoMatch { date: CalendarDate, text: String },

    #[error("Failed to write events file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode events: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed multimap from dates to events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds an event stamped with the current local time and returns its id.
    ///
    /// # Errors
    /// `EventError::EmptyText` for blank text, `Io`/`Serialize` if saving fails.
    pub fn add(&self, date: CalendarDate, text: &str) -> Result<u32, EventError> {
        let now = Local::now().naive_local();
        self.add_at(date, text, now)
    }

    /// Adds an event with an explicit creation time (truncated to the minute).
    ///
    /// # Errors
    /// `EventError::EmptyText` for blank text, `Io`/`Serialize` if saving fails.
    pub fn add_at(&self, date: CalendarDate, text: &str, created_at: NaiveDateTime) -> Result<u32, EventError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EventError::EmptyText);
        }

        let mut events = self.load();
        let list = events.entry(date).or_default();
        let id = list.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        list.push(EventRecord {
            id,
            text: text.to_owned(),
            created_at: truncate_to_minute(created_at),
        });

        self.save(&events)?;
        log::info!("added event #{id} on {date}");
        Ok(id)
    }

    /// Events of one date in insertion order
    pub fn list(&self, date: CalendarDate) -> Vec<EventRecord> {
        self.load().remove(&date).unwrap_or_default()
    }

    /// All events, newest date first; events of the same date newest first
    pub fn list_all(&self) -> Vec<DatedEvent> {
        flatten(self.load())
    }

    /// Statistics and the full listing from a single read of the file
    pub fn overview(&self) -> EventOverview {
        let events = self.load();
        EventOverview {
            stats:  stats_of(&events),
            events: flatten(events),
        }
    }

    /// Removes the event at 0-based `index` of `date` and renumbers the rest
    /// from 1. A date left without events disappears from the file.
    ///
    /// # Errors
    /// `EventError::NotFound` if there is no such event, `Io`/`Serialize` if
    /// saving fails.
    pub fn delete(&self, date: CalendarDate, index: usize) -> Result<EventRecord, EventError> {
        let mut events = self.load();
        let Some(list) = events.get_mut(&date).filter(|list| index < list.len()) else {
            return Err(EventError::NotFound { date, index });
        };

        let removed = list.remove(index);
        if list.is_empty() {
            events.remove(&date);
        } else {
            for (id, event) in (1..).zip(list.iter_mut()) {
                event.id = id;
            }
        }

        self.save(&events)?;
        log::info!("deleted event #{} on {date}", index + 1);
        Ok(removed)
    }

    /// Removes the first event of `date` whose text equals `text`.
    ///
    /// # Errors
    /// `EventError::NoMatch` if no event matches, `Io`/`Serialize` if saving
    /// fails.
    pub fn delete_matching(&self, date: CalendarDate, text: &str) -> Result<EventRecord, EventError> {
        let index = self
            .list(date)
            .iter()
            .position(|e| e.text == text)
            .ok_or_else(|| EventError::NoMatch {
                date,
                text: text.to_owned(),
            })?;
        self.delete(date, index)
    }

    pub fn stats(&self) -> EventStats {
        stats_of(&self.load())
    }

    /// Dates within `range` that have at least one event, in order
    pub fn dates_with_events(&self, range: &DateRange) -> Vec<CalendarDate> {
        self.load()
            .range(range.start()..=range.end())
            .map(|(date, _)| *date)
            .collect()
    }

    fn load(&self) -> EventMap {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return EventMap::new(),
            Err(e) => {
                log::warn!("failed to read events file {}: {e}", self.path.display());
                return EventMap::new();
            }
        };

        if content.trim().is_empty() {
            return EventMap::new();
        }

        match serde_json::from_str::<RawEventMap>(&content) {
            Ok(raw) => self.recover(raw),
            Err(e) => {
                log::warn!("events file {} is corrupted, treating it as empty: {e}", self.path.display());
                EventMap::new()
            }
        }
    }

    /// Keeps every readable entry: bad date keys and malformed records are
    /// dropped one by one, a bad `created_at` becomes the current time.
    fn recover(&self, raw: RawEventMap) -> EventMap {
        let mut events = EventMap::new();
        for (key, records) in raw {
            let Ok(date) = key.parse::<CalendarDate>() else {
                log::warn!("skipping invalid date {key:?} in {}", self.path.display());
                continue;
            };

            let list: Vec<EventRecord> = records
                .into_iter()
                .filter_map(|value| match serde_json::from_value::<RawRecord>(value) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        log::warn!("skipping malformed event on {date}: {e}");
                        None
                    }
                })
                .zip(1..)
                .map(|(record, position)| record.into_record(date, position))
                .collect();

            if !list.is_empty() {
                events.insert(date, list);
            }
        }
        events
    }

    fn save(&self, events: &EventMap) -> Result<(), EventError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        events.serialize(&mut serializer)?;

        fs::write(&self.path, buf)?;
        Ok(())
    }
}

fn stats_of(events: &EventMap) -> EventStats {
    EventStats {
        total_events:      events.values().map(Vec::len).sum(),
        dates_with_events: events.len(),
    }
}

fn flatten(events: EventMap) -> Vec<DatedEvent> {
    let mut all: Vec<DatedEvent> = events
        .into_iter()
        .flat_map(|(date, records)| records.into_iter().map(move |record| DatedEvent { date, record }))
        .collect();
    all.sort_by(|a, b| (b.date, b.record.created_at).cmp(&(a.date, a.record.created_at)));
    all
}

/// File contents before validation
type RawEventMap = BTreeMap<String, Vec<serde_json::Value>>;

#[derive(Deserialize)]
struct RawRecord {
    id:         Option<u32>,
    #[serde(default)]
    text:       String,
    created_at: Option<String>,
}

impl RawRecord {
    fn into_record(self, date: CalendarDate, position: u32) -> EventRecord {
        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok())
            .unwrap_or_else(|| {
                log::warn!("event on {date} has an invalid timestamp, using the current time");
                Local::now().naive_local()
            });

        EventRecord {
            id: self.id.unwrap_or(position),
            text: self.text,
            created_at: truncate_to_minute(created_at),
        }
    }
}

fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(t)
}

/// `created_at` as "YYYY-MM-DD HH:MM"
mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
