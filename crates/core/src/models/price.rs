use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single closing price observation (one trading day).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily closing prices of one ticker.
///
/// Dates are strictly increasing with no duplicates. The series is built
/// once at load time and never mutated afterwards, so the points are only
/// reachable through read accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

/// Wire form of a series; checked by `PriceSeries::new` on the way in.
#[derive(Deserialize)]
struct RawPriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = CoreError;

    fn try_from(raw: RawPriceSeries) -> Result<Self, Self::Error> {
        Self::new(raw.ticker, raw.points)
    }
}

impl PriceSeries {
    /// Build a series from points that are already in strictly increasing
    /// date order. Rejects unsorted or duplicate dates.
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, CoreError> {
        let ticker = ticker.into();
        if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(CoreError::ValidationError(format!(
                "Price series for {ticker} is not strictly increasing: {} followed by {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { ticker, points })
    }

    /// Build a series from arbitrary points: sorts by date and keeps the
    /// first row of any duplicated date. Returns the series and the number
    /// of dropped duplicates.
    pub fn from_unsorted(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> (Self, usize) {
        // stable sort keeps file order among equal dates
        points.sort_by_key(|p| p.date);
        let original_len = points.len();
        points.dedup_by_key(|p| p.date);
        let dropped = original_len - points.len();
        (
            Self {
                ticker: ticker.into(),
                points,
            },
            dropped,
        )
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Earliest observation date, if any.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.first().map(|p| p.date)
    }

    /// Latest observation date, if any.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.last().map(|p| p.date)
    }

    /// All points with `from <= date <= to`.
    /// Uses binary search on the sorted dates (O(log n)).
    pub fn range(&self, from: NaiveDate, to: NaiveDate) -> &[PricePoint] {
        if from > to {
            return &[];
        }
        // first entry >= from
        let start = self.points.partition_point(|p| p.date < from);
        // first entry > to
        let end = self.points.partition_point(|p| p.date <= to);
        &self.points[start..end]
    }

    /// All points whose calendar year lies in `[start_year, end_year]`.
    pub fn year_range(&self, start_year: i32, end_year: i32) -> &[PricePoint] {
        if start_year > end_year {
            return &[];
        }
        let start = self.points.partition_point(|p| p.date.year() < start_year);
        let end = self.points.partition_point(|p| p.date.year() <= end_year);
        &self.points[start..end]
    }

    /// Distinct calendar years covered by the series, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.points.iter().map(|p| p.date.year()).collect();
        years.dedup();
        years
    }
}
