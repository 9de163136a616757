use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::metrics::ImpactTable;

/// A single (date, value) point of a chart line.
///
/// The core generates these, the frontend just renders them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One line on a date-axis chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Ticker the line belongs to
    pub ticker: String,

    /// Legend label
    pub label: String,

    pub points: Vec<ChartPoint>,

    /// Cumulative return over the plotted points, when meaningful
    pub cumulative_return: Option<f64>,
}

/// How an event is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Vertical dashed line (single-day events)
    Line,
    /// Shaded span (multi-day events)
    Span,
}

/// An event annotation on a date-axis chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    pub name: String,
    pub kind: MarkerKind,
    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Text shown on hover
    pub tooltip: String,

    /// Label height as a fraction of the y-axis top, when labels are drawn
    pub label_height: Option<f64>,
}

/// Closing prices of a single ticker with a highlighted year window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChart {
    pub title: String,
    pub ticker: String,
    pub company_name: String,

    /// The whole series
    pub series: ChartSeries,

    /// Points inside the selected year window
    pub highlighted: Vec<ChartPoint>,

    pub markers: Vec<EventMarker>,

    /// e.g. "Cumulative Gain: 12.34%" or "Cumulative Gain: N/A"
    pub cumulative_gain_label: String,
}

impl PriceChart {
    /// Hover text for a point on the price line.
    pub fn tooltip(point: &ChartPoint) -> String {
        format!(
            "Date: {}\nPrice: ${:.2}",
            point.date.format("%Y-%m-%d"),
            point.value
        )
    }
}

/// Several tickers' closing prices over one year window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonChart {
    pub title: String,
    pub series: Vec<ChartSeries>,
}

impl ComparisonChart {
    /// Hover text for a point on one of the lines.
    pub fn tooltip(series: &ChartSeries, point: &ChartPoint) -> String {
        format!(
            "{}\nDate: {}\nPrice: ${:.2}\nCumulative Return: {:.2}%",
            series.ticker,
            point.date.format("%Y-%m-%d"),
            point.value,
            series.cumulative_return.unwrap_or(0.0)
        )
    }
}

/// One bar of the grouped yearly-change chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyBar {
    pub ticker: String,
    pub year: i32,

    /// Bar centre on the category axis (category index + group offset)
    pub x: f64,

    /// Bar height: the yearly change in percent
    pub yearly_change: f64,
    pub cumulative_return: f64,
    pub tooltip: String,
}

/// Grouped bar chart of yearly percentage changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyChangeChart {
    pub title: String,

    /// Category labels, one per year, in axis order
    pub years: Vec<i32>,

    /// Width of every bar in category units
    pub bar_width: f64,

    /// Tickers in legend order
    pub tickers: Vec<String>,
    pub bars: Vec<YearlyBar>,
}

/// Normalized price moves of selected tickers around selected events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventImpactChart {
    pub title: String,

    /// Set instead of the chart contents when there is nothing to draw
    pub placeholder: Option<String>,

    /// Visible date window
    pub window: Option<(NaiveDate, NaiveDate)>,

    /// Percent change from the first visible close
    pub series: Vec<ChartSeries>,
    pub markers: Vec<EventMarker>,
    pub impact_table: Option<ImpactTable>,
}

impl EventImpactChart {
    /// Hover text for a point on one of the normalized lines.
    pub fn tooltip(series: &ChartSeries, point: &ChartPoint) -> String {
        format!(
            "{}\nDate: {}\nChange: {:.2}%",
            series.label,
            point.date.format("%Y-%m-%d"),
            point.value
        )
    }
}
