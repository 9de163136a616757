use chrono::{Datelike, NaiveDate};

use crate::errors::CoreError;
use crate::models::chart::ChartPoint;
use crate::models::dataset::Dataset;
use crate::models::event::MarketEvent;
use crate::models::metrics::{EventImpact, Extremes, ImpactRow, ImpactTable, YearlyChange};
use crate::models::price::{PricePoint, PriceSeries};

/// Derives return and change figures from a ticker's closing prices.
///
/// Pure computation with no I/O and nothing cached. Every figure is recomputed
/// from the series on each call.
pub struct MetricsService;

impl MetricsService {
    pub fn new() -> Self {
        Self
    }

    /// Percent change from the first to the last close whose year lies in
    /// `[start_year, end_year]`.
    ///
    /// Returns `None` when no close falls in the window (including an
    /// inverted window) or when the first close is zero.
    pub fn cumulative_return(
        &self,
        series: &PriceSeries,
        start_year: i32,
        end_year: i32,
    ) -> Option<f64> {
        Self::return_between(series.year_range(start_year, end_year))
    }

    /// Year-over-year change of the year-end closes.
    ///
    /// Each calendar year with data is represented by its last close. The
    /// first year has no baseline and is omitted, so the result holds one
    /// row fewer than the number of distinct years. Years without any
    /// close are skipped; the following year compares against the most
    /// recent year that had data.
    pub fn yearly_changes(&self, series: &PriceSeries) -> Vec<YearlyChange> {
        let year_ends = Self::year_end_closes(series.points());

        let mut growth = 1.0;
        year_ends
            .windows(2)
            .map(|pair| {
                let (_, prev_close) = pair[0];
                let (year, close) = pair[1];
                let change = (close - prev_close) / prev_close;
                growth *= 1.0 + change;
                YearlyChange {
                    year,
                    pct_change: change * 100.0,
                    cumulative_return: (growth - 1.0) * 100.0,
                }
            })
            .collect()
    }

    /// Percent change across an event's window.
    ///
    /// Single-day events are widened by a day on each side first. Needs at
    /// least two closes inside the window, otherwise `NotAvailable`.
    pub fn event_impact(&self, series: &PriceSeries, event: &MarketEvent) -> EventImpact {
        let (from, to) = event.impact_window();
        let window = series.range(from, to);
        if window.len() < 2 {
            return EventImpact::NotAvailable;
        }
        match Self::return_between(window) {
            Some(change) => EventImpact::Change(change),
            None => EventImpact::NotAvailable,
        }
    }

    /// Lowest and highest close with their dates for closes whose year lies
    /// in `[start_year, end_year]`. Ties resolve to the earliest date.
    pub fn extremes(&self, series: &PriceSeries, start_year: i32, end_year: i32) -> Option<Extremes> {
        let window = series.year_range(start_year, end_year);
        let first = window.first()?;

        let mut min = *first;
        let mut max = *first;
        for point in &window[1..] {
            if point.close < min.close {
                min = *point;
            }
            if point.close > max.close {
                max = *point;
            }
        }

        let potential_gain = if min.close != 0.0 {
            (max.close - min.close) / min.close * 100.0
        } else {
            0.0
        };

        Some(Extremes {
            min_close: min.close,
            min_date: min.date,
            max_close: max.close,
            max_date: max.date,
            potential_gain,
        })
    }

    /// Closes in `[from, to]` expressed as percent change from the first
    /// close in that window. An empty window yields an empty line.
    pub fn normalized(
        &self,
        series: &PriceSeries,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ChartPoint>, CoreError> {
        let window = series.range(from, to);
        let Some(base) = window.first() else {
            return Ok(Vec::new());
        };
        if base.close == 0.0 || !base.close.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Invalid first price {} for {} on {}",
                base.close,
                series.ticker(),
                base.date
            )));
        }

        Ok(window
            .iter()
            .map(|p| ChartPoint {
                date: p.date,
                value: (p.close - base.close) / base.close * 100.0,
            })
            .collect())
    }

    /// Event × ticker table of impacts. Tickers without price data show
    /// `N/A` in every row.
    pub fn impact_table(
        &self,
        dataset: &Dataset,
        tickers: &[String],
        events: &[&MarketEvent],
    ) -> ImpactTable {
        let mut header = Vec::with_capacity(tickers.len() + 1);
        header.push("Event".to_string());
        header.extend(tickers.iter().cloned());

        let rows = events
            .iter()
            .map(|event| ImpactRow {
                event: event.name.clone(),
                cells: tickers
                    .iter()
                    .map(|ticker| match dataset.series(ticker) {
                        Some(series) => self.event_impact(series, event),
                        None => EventImpact::NotAvailable,
                    })
                    .collect(),
            })
            .collect();

        ImpactTable { header, rows }
    }

    // ── Internal ────────────────────────────────────────────────────

    fn return_between(window: &[PricePoint]) -> Option<f64> {
        let first = window.first()?;
        let last = window.last()?;
        if first.close == 0.0 {
            return None;
        }
        Some((last.close - first.close) / first.close * 100.0)
    }

    /// Last close of every calendar year present in `points`.
    fn year_end_closes(points: &[PricePoint]) -> Vec<(i32, f64)> {
        let mut year_ends: Vec<(i32, f64)> = Vec::new();
        for point in points {
            let year = point.date.year();
            match year_ends.last_mut() {
                Some(last) if last.0 == year => last.1 = point.close,
                _ => year_ends.push((year, point.close)),
            }
        }
        year_ends
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}
