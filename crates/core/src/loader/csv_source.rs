use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::dates::parse_date;
use super::traits::DataSource;
use crate::errors::CoreError;
use crate::models::company::CompanyMetadata;
use crate::models::event::MarketEvent;
use crate::models::price::{PricePoint, PriceSeries};
use crate::models::settings::Settings;

/// Price row. Headers are lowercased before matching.
#[derive(Debug, Deserialize)]
struct PriceRow {
    date: String,
    #[serde(default)]
    close: String,
}

#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(alias = "name")]
    event: String,
    #[serde(rename = "start date")]
    start_date: String,
    #[serde(rename = "end date")]
    end_date: String,
}

#[derive(Debug, Deserialize)]
struct CompanyRow {
    ticker: String,
    #[serde(default, alias = "company", alias = "company name")]
    name: Option<String>,
    sector: String,
    #[serde(rename = "headquarters state")]
    headquarters_state: String,
    #[serde(rename = "headquarters location")]
    headquarters_location: String,
    #[serde(rename = "market cap")]
    market_cap: String,
}

/// Reads every table from CSV files laid out as described by `Settings`:
/// one price file per ticker plus an events table and a metadata table.
pub struct CsvDirectorySource {
    settings: Settings,
}

impl CsvDirectorySource {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl DataSource for CsvDirectorySource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load_series(&self, ticker: &str) -> Result<PriceSeries, CoreError> {
        let path = self.settings.price_path(ticker);
        info!("Loading price data for {ticker} from: {}", path.display());

        let text = std::fs::read_to_string(&path)?;
        let rows: Vec<PriceRow> = read_rows(&path, skip_preamble(&text))?;

        let mut points = Vec::with_capacity(rows.len());
        let mut skipped = 0;
        for (idx, row) in rows.into_iter().enumerate() {
            let Some(close) = parse_close(&row.close) else {
                debug!(
                    "Skipping row {} of {}: unusable close '{}'",
                    idx + 1,
                    path.display(),
                    row.close
                );
                skipped += 1;
                continue;
            };
            match parse_date(&row.date) {
                Ok(date) => points.push(PricePoint::new(date, close)),
                Err(e) => {
                    debug!("Skipping row {} of {}: {e}", idx + 1, path.display());
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            warn!("Skipped {skipped} invalid price rows for {ticker}");
        }

        let (series, duplicates) = PriceSeries::from_unsorted(ticker.to_uppercase(), points);
        if duplicates > 0 {
            warn!("Removed {duplicates} duplicate dates for {ticker}");
        }

        if let (Some(first), Some(last)) = (series.start_date(), series.end_date()) {
            info!("Loaded {} closes for {ticker} from {first} to {last}", series.len());
        }
        Ok(series)
    }

    fn load_events(&self) -> Result<Vec<MarketEvent>, CoreError> {
        let path = self.settings.events_path();
        info!("Loading market events from: {}", path.display());

        let text = std::fs::read_to_string(&path)?;
        let rows: Vec<EventRow> = read_rows(&path, &text)?;

        let mut events = Vec::with_capacity(rows.len());
        for (idx, row) in rows.into_iter().enumerate() {
            let parsed = parse_date(&row.start_date)
                .and_then(|start| Ok((start, parse_date(&row.end_date)?)))
                .and_then(|(start, end)| MarketEvent::new(row.event.trim(), start, end));
            match parsed {
                Ok(event) => events.push(event),
                Err(e) => warn!("Skipping event row {} of {}: {e}", idx + 1, path.display()),
            }
        }

        info!("Loaded {} market events", events.len());
        Ok(events)
    }

    fn load_companies(&self) -> Result<Vec<CompanyMetadata>, CoreError> {
        let path = self.settings.metadata_path();
        info!("Loading company metadata from: {}", path.display());

        let text = std::fs::read_to_string(&path)?;
        let rows: Vec<CompanyRow> = read_rows(&path, &text)?;

        let mut companies = Vec::with_capacity(rows.len());
        for (idx, row) in rows.into_iter().enumerate() {
            let name = row
                .name
                .filter(|n| !n.is_empty())
                .or_else(|| self.settings.ticker_name(&row.ticker).map(str::to_string))
                .unwrap_or_else(|| row.ticker.clone());

            match CompanyMetadata::new(
                &row.ticker,
                name,
                row.sector,
                row.headquarters_state,
                row.headquarters_location,
                &row.market_cap,
            ) {
                Some(company) => companies.push(company),
                None => warn!(
                    "Skipping metadata row {} of {}: market cap '{}' has no number",
                    idx + 1,
                    path.display(),
                    row.market_cap
                ),
            }
        }

        info!("Loaded metadata for {} companies", companies.len());
        Ok(companies)
    }
}

/// Deserialize all rows of a CSV document, matching headers
/// case-insensitively. A row that does not fit `T` fails the whole table
/// with its position.
fn read_rows<T: DeserializeOwned>(path: &Path, text: &str) -> Result<Vec<T>, CoreError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    reader.set_headers(headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row = result.map_err(|e| CoreError::InvalidRecord {
            source_name: path.display().to_string(),
            row: idx + 1,
            message: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Closing price cell: a finite number, optionally written with a `$` or
/// thousands separators. Blank cells are gaps.
fn parse_close(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|c| c.is_finite())
}

/// Price downloads sometimes start with disclaimer lines. Skip every
/// record before the first one that names both a `date` and a `close`
/// column.
fn skip_preamble(text: &str) -> &str {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut record = StringRecord::new();
    while let Ok(true) = reader.read_record(&mut record) {
        let has_column = |name: &str| record.iter().any(|c| c.eq_ignore_ascii_case(name));
        if has_column("date") && has_column("close") {
            let Some(position) = record.position() else {
                break;
            };
            let start = usize::try_from(position.byte()).unwrap_or(0);
            return text.get(start..).unwrap_or(text);
        }
    }
    text
}
