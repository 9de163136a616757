pub mod errors;
pub mod loader;
pub mod models;
pub mod services;

use loader::csv_source::CsvDirectorySource;
use models::{
    chart::{ComparisonChart, EventImpactChart, PriceChart, YearlyChangeChart},
    dataset::Dataset,
    event::{EventSortOrder, MarketEvent},
    metrics::{EventImpact, Extremes, YearlyChange},
    price::PriceSeries,
    settings::Settings,
};
use serde::Serialize;
use services::{
    chart_service::{self, ChartService},
    event_service::EventService,
    filter_service::{FilterOptions, FilterService, MetadataFilter},
    metrics_service::MetricsService,
};

use errors::CoreError;

/// Main entry point for the stock-events core library.
/// Holds the loaded tables and all services needed to compute views from them.
#[must_use]
pub struct MarketExplorer {
    dataset: Dataset,
    settings: Settings,
    metrics_service: MetricsService,
    event_service: EventService,
    filter_service: FilterService,
    chart_service: ChartService,
}

impl std::fmt::Debug for MarketExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketExplorer")
            .field("tickers", &self.dataset.all_series().len())
            .field("events", &self.dataset.events().len())
            .field("companies", &self.dataset.companies().len())
            .field("data_dir", &self.settings.data_dir)
            .finish()
    }
}

impl MarketExplorer {
    /// Load every table from the CSV layout in `settings`.
    ///
    /// A missing or malformed file is logged and leaves the affected ticker
    /// or table empty; loading itself never fails.
    pub fn load(settings: Settings) -> Self {
        let source = CsvDirectorySource::new(settings.clone());
        let dataset = Dataset::load_lenient(&source, &settings.tickers);
        Self::build(dataset, settings)
    }

    /// Load every table, failing on the first unreadable file.
    pub fn load_strict(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let source = CsvDirectorySource::new(settings.clone());
        let dataset = Dataset::load(&source, &settings.tickers)?;
        Ok(Self::build(dataset, settings))
    }

    /// Wrap an already loaded dataset.
    pub fn from_dataset(dataset: Dataset, settings: Settings) -> Self {
        Self::build(dataset, settings)
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Tickers ─────────────────────────────────────────────────────

    /// Dropdown labels for every loaded ticker, e.g. "AAPL - Apple".
    #[must_use]
    pub fn ticker_labels(&self) -> Vec<String> {
        self.dataset
            .tickers()
            .into_iter()
            .map(|t| format!("{t} - {}", self.company_name(t)))
            .collect()
    }

    /// Split a dropdown label back into `(ticker, company name)`.
    #[must_use]
    pub fn parse_ticker_label(label: &str) -> Option<(&str, &str)> {
        let (ticker, name) = label.split_once(" - ")?;
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return None;
        }
        Some((ticker, name.trim()))
    }

    /// Display name for a ticker; "Unknown Company" when nothing is known.
    #[must_use]
    pub fn company_name(&self, ticker: &str) -> String {
        chart_service::company_name(&self.dataset, &self.settings, ticker)
    }

    // ── Metrics ─────────────────────────────────────────────────────

    /// Percent return between the first and last close in the year window.
    /// `Ok(None)` when the window holds no closes.
    pub fn cumulative_return(
        &self,
        ticker: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Option<f64>, CoreError> {
        let series = self.series(ticker)?;
        Ok(self
            .metrics_service
            .cumulative_return(series, start_year, end_year))
    }

    /// Year-over-year changes of a ticker's year-end closes.
    pub fn yearly_changes(&self, ticker: &str) -> Result<Vec<YearlyChange>, CoreError> {
        let series = self.series(ticker)?;
        Ok(self.metrics_service.yearly_changes(series))
    }

    /// Lowest/highest close in the year window.
    pub fn extremes(
        &self,
        ticker: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Option<Extremes>, CoreError> {
        let series = self.series(ticker)?;
        Ok(self.metrics_service.extremes(series, start_year, end_year))
    }

    /// Price change of a ticker across a named event.
    pub fn event_impact(&self, ticker: &str, event_name: &str) -> Result<EventImpact, CoreError> {
        let series = self.series(ticker)?;
        let event = self.event_service.find_by_name(&self.dataset, event_name)?;
        Ok(self.metrics_service.event_impact(series, event))
    }

    // ── Events ──────────────────────────────────────────────────────

    /// Events whose years intersect the window, in table order.
    #[must_use]
    pub fn overlapping_events(&self, start_year: i32, end_year: i32) -> Vec<&MarketEvent> {
        self.event_service
            .overlapping(self.dataset.events(), start_year, end_year)
    }

    /// Events in the requested order. Ties keep their given order.
    #[must_use]
    pub fn sorted_events<'e>(&self, events: &[&'e MarketEvent], order: EventSortOrder) -> Vec<&'e MarketEvent> {
        self.event_service.sorted(events, order)
    }

    /// Event names in table order, for the event picker.
    #[must_use]
    pub fn event_names(&self) -> Vec<&str> {
        self.dataset.events().iter().map(|e| e.name.as_str()).collect()
    }

    // ── Filters ─────────────────────────────────────────────────────

    /// Tickers whose metadata satisfies the filter, in table order.
    #[must_use]
    pub fn filter_tickers(&self, filter: &MetadataFilter) -> Vec<String> {
        self.filter_service
            .filter_tickers(self.dataset.companies(), filter)
    }

    /// Values for the sector/state/location dropdowns and cap spin-boxes.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        self.filter_service.options(self.dataset.companies())
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Single-ticker price chart with the year window highlighted.
    pub fn price_chart(
        &self,
        ticker: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<PriceChart, CoreError> {
        self.validate_years(start_year, end_year)?;
        self.chart_service
            .price_chart(&self.dataset, &self.settings, ticker, start_year, end_year)
    }

    /// Price lines of every ticker passing the filter.
    pub fn comparison_chart(
        &self,
        filter: &MetadataFilter,
        start_year: i32,
        end_year: i32,
    ) -> Result<ComparisonChart, CoreError> {
        self.validate_years(start_year, end_year)?;
        let tickers = self.filter_tickers(filter);
        Ok(self
            .chart_service
            .comparison_chart(&self.dataset, &tickers, start_year, end_year))
    }

    /// Yearly change bars of every ticker passing the filter.
    pub fn yearly_change_chart(
        &self,
        filter: &MetadataFilter,
        start_year: i32,
        end_year: i32,
    ) -> Result<YearlyChangeChart, CoreError> {
        self.validate_years(start_year, end_year)?;
        let tickers = self.filter_tickers(filter);
        Ok(self.chart_service.yearly_change_chart(
            &self.dataset,
            &self.settings,
            &tickers,
            start_year,
            end_year,
        ))
    }

    /// Normalized lines of the selected tickers around the selected events.
    /// Repeated tickers are ignored; unknown event names are an error.
    pub fn event_impact_chart(
        &self,
        tickers: &[String],
        event_names: &[String],
    ) -> Result<EventImpactChart, CoreError> {
        let mut unique: Vec<String> = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let upper = ticker.trim().to_uppercase();
            if !unique.contains(&upper) {
                unique.push(upper);
            }
        }
        self.chart_service
            .event_impact_chart(&self.dataset, &unique, event_names)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Serialize any view model or metric to pretty JSON.
    pub fn to_json<T: Serialize>(value: &T) -> Result<String, CoreError> {
        serde_json::to_string_pretty(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize view: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn series(&self, ticker: &str) -> Result<&PriceSeries, CoreError> {
        self.dataset
            .series(ticker)
            .ok_or_else(|| CoreError::TickerNotFound(ticker.to_string()))
    }

    /// Year selectors are bounded by the configured range. An inverted
    /// window is allowed and simply selects nothing.
    fn validate_years(&self, start_year: i32, end_year: i32) -> Result<(), CoreError> {
        let (min, max) = (self.settings.min_year, self.settings.max_year);
        for year in [start_year, end_year] {
            if year < min || year > max {
                return Err(CoreError::ValidationError(format!(
                    "Year {year} is outside the selectable range {min}-{max}"
                )));
            }
        }
        Ok(())
    }

    fn build(dataset: Dataset, settings: Settings) -> Self {
        Self {
            dataset,
            settings,
            metrics_service: MetricsService::new(),
            event_service: EventService::new(),
            filter_service: FilterService::new(),
            chart_service: ChartService::new(),
        }
    }
}
