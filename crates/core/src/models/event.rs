use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Sort order for market event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSortOrder {
    /// Earliest start date first (label placement order)
    StartAsc,
    /// Latest start date first
    StartDesc,
    /// Alphabetical by event name
    NameAsc,
    /// Longest span first
    DurationDesc,
}

/// A named market event covering `[start, end]` (inclusive).
///
/// `start == end` denotes a single-day event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMarketEvent")]
pub struct MarketEvent {
    /// Display name (e.g., "COVID-19 Crash")
    pub name: String,

    /// First day of the event
    pub start: NaiveDate,

    /// Last day of the event (never before `start`)
    pub end: NaiveDate,
}

#[derive(Deserialize)]
struct RawMarketEvent {
    name: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawMarketEvent> for MarketEvent {
    type Error = CoreError;

    fn try_from(raw: RawMarketEvent) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.start, raw.end)
    }
}

impl MarketEvent {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        let name = name.into();
        if start > end {
            return Err(CoreError::ValidationError(format!(
                "Event '{name}' ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { name, start, end })
    }

    /// Convenience constructor for a one-day event.
    pub fn single_day(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start: date,
            end: date,
        }
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Year-granular overlap test: the event counts as visible in
    /// `[start_year, end_year]` when its years intersect that range.
    pub fn overlaps_years(&self, start_year: i32, end_year: i32) -> bool {
        self.start.year() <= end_year && self.end.year() >= start_year
    }

    /// Window used to measure price impact. Single-day events are widened
    /// by one day on each side so the close before and after is captured.
    pub fn impact_window(&self) -> (NaiveDate, NaiveDate) {
        if self.is_single_day() {
            (
                self.start.checked_sub_days(Days::new(1)).unwrap_or(self.start),
                self.end.checked_add_days(Days::new(1)).unwrap_or(self.end),
            )
        } else {
            (self.start, self.end)
        }
    }

    /// Window shown around the event when it is selected for comparison.
    /// Single-day events get three weeks of context on each side.
    pub fn context_window(&self) -> (NaiveDate, NaiveDate) {
        if self.is_single_day() {
            (
                self.start.checked_sub_days(Days::new(21)).unwrap_or(self.start),
                self.end.checked_add_days(Days::new(21)).unwrap_or(self.end),
            )
        } else {
            (self.start, self.end)
        }
    }

    /// Span to shade on a chart. Single-day events are drawn one day wide.
    pub fn highlight_span(&self) -> (NaiveDate, NaiveDate) {
        if self.is_single_day() {
            (
                self.start,
                self.end.checked_add_days(Days::new(1)).unwrap_or(self.end),
            )
        } else {
            (self.start, self.end)
        }
    }

    /// Hover text for the event marker.
    pub fn tooltip(&self) -> String {
        if self.is_single_day() {
            format!("Event: {}\nDate: {}", self.name, self.start.format("%Y-%m-%d"))
        } else {
            format!(
                "Event: {}\nPeriod: {} to\n        {}",
                self.name,
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            )
        }
    }
}
