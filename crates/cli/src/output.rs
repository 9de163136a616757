use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;
use stock_events_core::models::chart::{
    ComparisonChart, EventImpactChart, EventMarker, MarkerKind, PriceChart, YearlyChangeChart,
};
use stock_events_core::models::event::MarketEvent;
use stock_events_core::models::metrics::ImpactTable;
use stock_events_core::services::filter_service::{FilterOptions, WILDCARD};

use crate::cli::OutputFormat;
use crate::commands::TickerMetrics;
use crate::error::CliError;

/// Types that have a plain-text rendering besides their JSON form.
pub trait TextView {
    fn to_text(&self) -> String;
}

pub fn render<T: Serialize + TextView>(
    value: &T,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let body = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Text => value.to_text(),
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", body.trim_end())?;
    Ok(())
}

impl TextView for Vec<String> {
    fn to_text(&self) -> String {
        self.join("\n")
    }
}

impl TextView for Vec<MarketEvent> {
    fn to_text(&self) -> String {
        let mut out = String::new();
        for event in self {
            if event.is_single_day() {
                let _ = writeln!(out, "{}  {}", event.start, event.name);
            } else {
                let _ = writeln!(out, "{} .. {}  {}", event.start, event.end, event.name);
            }
        }
        out
    }
}

impl TextView for FilterOptions {
    fn to_text(&self) -> String {
        let list = |values: &[String]| {
            std::iter::once(WILDCARD.to_string())
                .chain(values.iter().cloned())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut out = String::new();
        let _ = writeln!(out, "Sector:   {}", list(&self.sectors));
        let _ = writeln!(out, "State:    {}", list(&self.states));
        let _ = writeln!(out, "Location: {}", list(&self.locations));
        match self.market_cap_bounds {
            Some((min, max)) => {
                let _ = writeln!(out, "Market Cap: {min:.1} - {max:.1}");
            }
            None => {
                let _ = writeln!(out, "Market Cap: N/A");
            }
        }
        out
    }
}

impl TextView for TickerMetrics {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} - {} ({}-{})",
            self.ticker, self.company_name, self.start_year, self.end_year
        );
        match self.cumulative_return {
            Some(r) => {
                let _ = writeln!(out, "Cumulative Gain: {r:.2}%");
            }
            None => {
                let _ = writeln!(out, "Cumulative Gain: N/A");
            }
        }
        if let Some(x) = &self.extremes {
            let _ = writeln!(out, "Low:  ${:.2} on {}", x.min_close, x.min_date);
            let _ = writeln!(out, "High: ${:.2} on {}", x.max_close, x.max_date);
            let _ = writeln!(out, "Potential Gain: {:.2}%", x.potential_gain);
        }
        if !self.yearly_changes.is_empty() {
            let _ = writeln!(out, "\nYear  Change   Cumulative");
            for c in &self.yearly_changes {
                let _ = writeln!(
                    out,
                    "{}  {:>6.1}%  {:>9.1}%",
                    c.year, c.pct_change, c.cumulative_return
                );
            }
        }
        out
    }
}

impl TextView for PriceChart {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", self.cumulative_gain_label);
        if let (Some(first), Some(last)) = (self.highlighted.first(), self.highlighted.last()) {
            let _ = writeln!(
                out,
                "Highlighted: {} (${:.2}) to {} (${:.2}), {} closes",
                first.date,
                first.value,
                last.date,
                last.value,
                self.highlighted.len()
            );
        }
        write_markers(&mut out, &self.markers);
        out
    }
}

impl TextView for ComparisonChart {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        for series in &self.series {
            let _ = writeln!(
                out,
                "{:<8} {:>10}  {} closes",
                series.ticker,
                percent(series.cumulative_return),
                series.points.len()
            );
        }
        out
    }
}

impl TextView for YearlyChangeChart {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        if self.bars.is_empty() {
            return out;
        }
        let _ = write!(out, "{:<6}", "Year");
        for ticker in &self.tickers {
            let _ = write!(out, " {ticker:>8}");
        }
        out.push('\n');
        for year in &self.years {
            let _ = write!(out, "{year:<6}");
            for ticker in &self.tickers {
                let cell = self
                    .bars
                    .iter()
                    .find(|b| b.year == *year && &b.ticker == ticker)
                    .map(|b| format!("{:.1}%", b.yearly_change))
                    .unwrap_or_else(|| "-".to_string());
                let _ = write!(out, " {cell:>8}");
            }
            out.push('\n');
        }
        out
    }
}

impl TextView for EventImpactChart {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        if let Some(message) = &self.placeholder {
            let _ = writeln!(out, "{message}");
            return out;
        }
        if let Some((from, to)) = self.window {
            let _ = writeln!(out, "Window: {from} to {to}");
        }
        for series in &self.series {
            let _ = writeln!(
                out,
                "{:<8} {:>10} over window",
                series.ticker,
                percent(series.cumulative_return)
            );
        }
        write_markers(&mut out, &self.markers);
        if let Some(table) = &self.impact_table {
            out.push('\n');
            write_table(&mut out, table);
        }
        out
    }
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn write_markers(out: &mut String, markers: &[EventMarker]) {
    if markers.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nEvents:");
    for marker in markers {
        match marker.kind {
            MarkerKind::Line => {
                let _ = writeln!(out, "  | {}  {}", marker.start, marker.name);
            }
            MarkerKind::Span => {
                let _ = writeln!(out, "  # {} .. {}  {}", marker.start, marker.end, marker.name);
            }
        }
    }
}

fn write_table(out: &mut String, table: &ImpactTable) {
    let rows = table.to_text_rows();
    let columns = rows.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|r| r.get(col))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  "));
    }
}
