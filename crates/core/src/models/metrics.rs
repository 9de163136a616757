use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Year-over-year change of one ticker, based on year-end closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyChange {
    /// Calendar year this row describes
    pub year: i32,

    /// Year-end close vs. the previous year-end close, in percent
    pub pct_change: f64,

    /// Compounded return since the first year-end in the series, in percent
    pub cumulative_return: f64,
}

/// Lowest and highest close in a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub min_close: f64,
    pub min_date: NaiveDate,
    pub max_close: f64,
    pub max_date: NaiveDate,

    /// (max − min) / min × 100: the gain from buying at the low and
    /// selling at the high, ignoring which came first
    pub potential_gain: f64,
}

/// Price change of one ticker across one market event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventImpact {
    /// Percent change between the first and last close in the event window
    Change(f64),
    /// Fewer than two closes fall inside the event window
    NotAvailable,
}

impl EventImpact {
    pub fn value(&self) -> Option<f64> {
        match self {
            EventImpact::Change(v) => Some(*v),
            EventImpact::NotAvailable => None,
        }
    }

    /// Sign classification used for table cell colouring.
    pub fn tone(&self) -> CellTone {
        match self.value() {
            Some(v) if v > 0.0 => CellTone::Positive,
            Some(v) if v < 0.0 => CellTone::Negative,
            Some(_) => CellTone::Neutral,
            None => CellTone::NotAvailable,
        }
    }
}

impl std::fmt::Display for EventImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventImpact::Change(v) => write!(f, "{v:.2}%"),
            EventImpact::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// How an impact cell should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellTone {
    Positive,
    Negative,
    Neutral,
    NotAvailable,
}

/// One row of the impact table: an event and its impact on each ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRow {
    pub event: String,
    pub cells: Vec<EventImpact>,
}

/// Event × ticker grid of price impacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactTable {
    /// `"Event"` followed by the ticker columns
    pub header: Vec<String>,
    pub rows: Vec<ImpactRow>,
}

impl ImpactTable {
    /// The table as display strings, header row first.
    pub fn to_text_rows(&self) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.header.clone());
        for row in &self.rows {
            let mut line = Vec::with_capacity(row.cells.len() + 1);
            line.push(row.event.clone());
            line.extend(row.cells.iter().map(|c| c.to_string()));
            out.push(line);
        }
        out
    }
}
