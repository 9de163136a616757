use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::company::CompanyMetadata;
use super::event::MarketEvent;
use super::price::PriceSeries;
use super::settings::TickerInfo;
use crate::errors::CoreError;
use crate::loader::traits::DataSource;

/// The read-only tables every view is computed from.
///
/// Loaded once at start-up and passed by reference to the services.
/// Contains: one price series per ticker (in configured order), the market
/// events table and the company metadata table (both in file order).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    series: Vec<PriceSeries>,
    events: Vec<MarketEvent>,
    companies: Vec<CompanyMetadata>,
}

impl Dataset {
    pub fn new(
        series: Vec<PriceSeries>,
        events: Vec<MarketEvent>,
        companies: Vec<CompanyMetadata>,
    ) -> Self {
        Self {
            series,
            events,
            companies,
        }
    }

    /// Load every table, failing on the first error.
    pub fn load(source: &dyn DataSource, tickers: &[TickerInfo]) -> Result<Self, CoreError> {
        let mut series = Vec::with_capacity(tickers.len());
        for info in tickers {
            series.push(source.load_series(&info.ticker)?);
        }
        let events = source.load_events()?;
        let companies = source.load_companies()?;
        Ok(Self::new(series, events, companies))
    }

    /// Load every table, logging failures and leaving the affected ticker
    /// or table empty instead of aborting.
    pub fn load_lenient(source: &dyn DataSource, tickers: &[TickerInfo]) -> Self {
        let mut series = Vec::with_capacity(tickers.len());
        for info in tickers {
            match source.load_series(&info.ticker) {
                Ok(s) => series.push(s),
                Err(e) => warn!(
                    source = source.name(),
                    ticker = %info.ticker,
                    "Error loading price data: {e}"
                ),
            }
        }

        let events = source.load_events().unwrap_or_else(|e| {
            warn!(source = source.name(), "Error loading market events: {e}");
            Vec::new()
        });

        let companies = source.load_companies().unwrap_or_else(|e| {
            warn!(source = source.name(), "Error loading company metadata: {e}");
            Vec::new()
        });

        info!(
            tickers = series.len(),
            events = events.len(),
            companies = companies.len(),
            "Dataset loaded"
        );

        Self::new(series, events, companies)
    }

    pub fn all_series(&self) -> &[PriceSeries] {
        &self.series
    }

    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    pub fn companies(&self) -> &[CompanyMetadata] {
        &self.companies
    }

    /// Price series for a ticker (case-insensitive).
    pub fn series(&self, ticker: &str) -> Option<&PriceSeries> {
        self.series
            .iter()
            .find(|s| s.ticker().eq_ignore_ascii_case(ticker))
    }

    /// Market event by exact name.
    pub fn event(&self, name: &str) -> Option<&MarketEvent> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Company metadata for a ticker (case-insensitive).
    pub fn company(&self, ticker: &str) -> Option<&CompanyMetadata> {
        self.companies
            .iter()
            .find(|c| c.ticker.eq_ignore_ascii_case(ticker))
    }

    /// Tickers with loaded price data, in load order.
    pub fn tickers(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.ticker()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.events.is_empty() && self.companies.is_empty()
    }
}
