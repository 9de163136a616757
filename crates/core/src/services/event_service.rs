use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::dataset::Dataset;
use crate::models::event::{EventSortOrder, MarketEvent};

/// Top label height, as a fraction of the y-axis maximum.
const LABEL_TOP: f64 = 1.0;

/// Minimum vertical distance between two event labels.
const LABEL_GAP: f64 = 0.05;

/// Selects, orders and lays out market events.
pub struct EventService;

impl EventService {
    pub fn new() -> Self {
        Self
    }

    /// Events whose years intersect `[start_year, end_year]`, in table order.
    ///
    /// Comparison is by year only: an event ending in January of
    /// `start_year` still counts as overlapping.
    pub fn overlapping<'a>(
        &self,
        events: &'a [MarketEvent],
        start_year: i32,
        end_year: i32,
    ) -> Vec<&'a MarketEvent> {
        events
            .iter()
            .filter(|e| e.overlaps_years(start_year, end_year))
            .collect()
    }

    /// Look up an event by its exact name.
    pub fn find_by_name<'a>(
        &self,
        dataset: &'a Dataset,
        name: &str,
    ) -> Result<&'a MarketEvent, CoreError> {
        dataset
            .event(name)
            .ok_or_else(|| CoreError::EventNotFound(name.to_string()))
    }

    /// Resolve a list of names, dropping repeated names (first one wins).
    pub fn resolve<'a>(
        &self,
        dataset: &'a Dataset,
        names: &[String],
    ) -> Result<Vec<&'a MarketEvent>, CoreError> {
        let mut selected: Vec<&MarketEvent> = Vec::with_capacity(names.len());
        for name in names {
            let event = self.find_by_name(dataset, name)?;
            if !selected.iter().any(|e| e.name == event.name) {
                selected.push(event);
            }
        }
        Ok(selected)
    }

    /// Events sorted by a specific order. Ties keep table order.
    pub fn sorted<'a>(&self, events: &[&'a MarketEvent], order: EventSortOrder) -> Vec<&'a MarketEvent> {
        let mut sorted = events.to_vec();
        match order {
            EventSortOrder::StartAsc => sorted.sort_by_key(|e| e.start),
            EventSortOrder::StartDesc => sorted.sort_by(|a, b| b.start.cmp(&a.start)),
            EventSortOrder::NameAsc => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
            EventSortOrder::DurationDesc => {
                sorted.sort_by_key(|e| std::cmp::Reverse(e.duration_days()))
            }
        }
        sorted
    }

    /// Date window to show for a selection of events.
    ///
    /// Covers the context window of every selected event (single-day events
    /// get three weeks either side). With nothing selected, covers every
    /// loaded price series. `None` when there is nothing to cover.
    pub fn selection_window(
        &self,
        dataset: &Dataset,
        selected: &[&MarketEvent],
    ) -> Option<(NaiveDate, NaiveDate)> {
        if selected.is_empty() {
            let start = dataset
                .all_series()
                .iter()
                .filter_map(|s| s.start_date())
                .min()?;
            let end = dataset
                .all_series()
                .iter()
                .filter_map(|s| s.end_date())
                .max()?;
            return Some((start, end));
        }

        let windows: Vec<(NaiveDate, NaiveDate)> =
            selected.iter().map(|e| e.context_window()).collect();
        let start = windows.iter().map(|w| w.0).min()?;
        let end = windows.iter().map(|w| w.1).max()?;
        Some((start, end))
    }

    /// Heights for `count` labels placed in start-date order, stepping down
    /// from the top so no two labels sit closer than the gap.
    pub fn stagger_labels(&self, count: usize) -> Vec<f64> {
        let mut heights: Vec<f64> = Vec::with_capacity(count);
        let mut current = LABEL_TOP;
        for _ in 0..count {
            while heights.iter().any(|h| (h - current).abs() < LABEL_GAP) {
                current -= LABEL_GAP;
            }
            heights.push(current);
            current -= LABEL_GAP;
        }
        heights
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new()
    }
}
