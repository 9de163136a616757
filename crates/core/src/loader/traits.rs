use crate::errors::CoreError;
use crate::models::company::CompanyMetadata;
use crate::models::event::MarketEvent;
use crate::models::price::PriceSeries;

/// Trait abstraction for everything that can supply the input tables.
///
/// The CSV directory layout is one implementation; tests and embedding
/// frontends use the in-memory one. Services only ever see the `Dataset`
/// built from a source, never the source itself.
pub trait DataSource {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Daily closing prices of one ticker, sorted by date.
    fn load_series(&self, ticker: &str) -> Result<PriceSeries, CoreError>;

    /// The market events table in source order.
    fn load_events(&self) -> Result<Vec<MarketEvent>, CoreError>;

    /// The company metadata table in source order.
    fn load_companies(&self) -> Result<Vec<CompanyMetadata>, CoreError>;
}
