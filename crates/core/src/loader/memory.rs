use std::collections::HashMap;

use super::traits::DataSource;
use crate::errors::CoreError;
use crate::models::company::CompanyMetadata;
use crate::models::event::MarketEvent;
use crate::models::price::{PricePoint, PriceSeries};

/// Data source backed by tables already in memory.
///
/// Frontends that fetch or generate data themselves hand it over through
/// this source; tests use it to avoid touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, Vec<PricePoint>>,
    events: Vec<MarketEvent>,
    companies: Vec<CompanyMetadata>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a ticker's closes. Points may be in any order.
    pub fn with_series(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.series.insert(ticker.to_uppercase(), points);
        self
    }

    pub fn with_event(mut self, event: MarketEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_company(mut self, company: CompanyMetadata) -> Self {
        self.companies.push(company);
        self
    }
}

impl DataSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn load_series(&self, ticker: &str) -> Result<PriceSeries, CoreError> {
        let key = ticker.to_uppercase();
        let points = self
            .series
            .get(&key)
            .ok_or_else(|| CoreError::TickerNotFound(ticker.to_string()))?;
        let (series, _) = PriceSeries::from_unsorted(key, points.clone());
        Ok(series)
    }

    fn load_events(&self) -> Result<Vec<MarketEvent>, CoreError> {
        Ok(self.events.clone())
    }

    fn load_companies(&self) -> Result<Vec<CompanyMetadata>, CoreError> {
        Ok(self.companies.clone())
    }
}
