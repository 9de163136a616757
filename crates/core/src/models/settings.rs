use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// A ticker to load together with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub ticker: String,
    pub name: String,
}

impl TickerInfo {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into().to_uppercase(),
            name: name.into(),
        }
    }

    /// Dropdown label, e.g. "AAPL - Apple".
    pub fn label(&self) -> String {
        format!("{} - {}", self.ticker, self.name)
    }
}

/// Where the data lives and which tickers/years the views offer.
/// Stored as JSON; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding all input tables.
    pub data_dir: PathBuf,

    /// File name of a ticker's price CSV; `{ticker}` is substituted.
    pub price_file_template: String,

    /// Market events table, relative to `data_dir`.
    pub events_file: String,

    /// Company metadata table, relative to `data_dir`.
    pub metadata_file: String,

    /// Tickers to load, in display order.
    pub tickers: Vec<TickerInfo>,

    /// Lowest selectable year.
    pub min_year: i32,

    /// Highest selectable year.
    pub max_year: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            price_file_template: "MacroTrends_Data_Download_{ticker}.csv".to_string(),
            events_file: "stock_market_events_with_dates.csv".to_string(),
            metadata_file: "top_25_us_stocks.csv".to_string(),
            tickers: default_tickers(),
            min_year: 1980,
            max_year: 2024,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw).map_err(|e| {
            CoreError::Config(format!("Invalid settings file {}: {e}", path.display()))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.min_year > self.max_year {
            return Err(CoreError::Config(format!(
                "min_year ({}) must not be after max_year ({})",
                self.min_year, self.max_year
            )));
        }
        if !self.price_file_template.contains("{ticker}") {
            return Err(CoreError::Config(format!(
                "price_file_template '{}' must contain a {{ticker}} placeholder",
                self.price_file_template
            )));
        }
        Ok(())
    }

    pub fn price_path(&self, ticker: &str) -> PathBuf {
        self.data_dir
            .join(self.price_file_template.replace("{ticker}", ticker))
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(&self.events_file)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    /// Display name configured for a ticker.
    pub fn ticker_name(&self, ticker: &str) -> Option<&str> {
        self.tickers
            .iter()
            .find(|t| t.ticker.eq_ignore_ascii_case(ticker))
            .map(|t| t.name.as_str())
    }
}

/// The 24 large-cap US tickers the viewers ship with.
pub fn default_tickers() -> Vec<TickerInfo> {
    [
        ("AAPL", "Apple"),
        ("ABBV", "AbbVie"),
        ("AVGO", "Broadcom"),
        ("BAC", "Bank of America"),
        ("BRK.A", "Berkshire Hathaway A"),
        ("BRK.B", "Berkshire Hathaway B"),
        ("COST", "Costco"),
        ("GOOGL", "Alphabet"),
        ("HD", "Home Depot"),
        ("JNJ", "Johnson & Johnson"),
        ("JPM", "JPMorgan Chase"),
        ("LLY", "Eli Lilly"),
        ("MA", "MasterCard"),
        ("META", "Meta Platforms"),
        ("MSFT", "Microsoft"),
        ("NFLX", "Netflix"),
        ("NVDA", "NVIDIA"),
        ("ORCL", "Oracle"),
        ("PG", "Procter & Gamble"),
        ("TSLA", "Tesla"),
        ("UNH", "UnitedHealth"),
        ("V", "Visa"),
        ("WMT", "Walmart"),
        ("XOM", "ExxonMobil"),
    ]
    .into_iter()
    .map(|(ticker, name)| TickerInfo::new(ticker, name))
    .collect()
}
