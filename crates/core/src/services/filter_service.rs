use serde::{Deserialize, Serialize};

use crate::models::company::CompanyMetadata;

/// Dropdown value that matches everything.
pub const WILDCARD: &str = "All";

/// Company metadata constraints. Every field is optional; `"All"` (or
/// `None`) leaves that column unconstrained. Cap bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub sector: Option<String>,
    pub state: Option<String>,
    pub location: Option<String>,
    pub min_cap: Option<f64>,
    pub max_cap: Option<f64>,
}

impl MetadataFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn cap_range(mut self, min_cap: Option<f64>, max_cap: Option<f64>) -> Self {
        self.min_cap = min_cap;
        self.max_cap = max_cap;
        self
    }

    /// All constraints hold for `company`.
    pub fn matches(&self, company: &CompanyMetadata) -> bool {
        text_matches(self.sector.as_deref(), &company.sector)
            && text_matches(self.state.as_deref(), &company.headquarters_state)
            && text_matches(self.location.as_deref(), &company.headquarters_location)
            && self.min_cap.map_or(true, |min| company.market_cap >= min)
            && self.max_cap.map_or(true, |max| company.market_cap <= max)
    }
}

/// Everything needed to populate the filter controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub sectors: Vec<String>,
    pub states: Vec<String>,
    pub locations: Vec<String>,
    pub market_cap_bounds: Option<(f64, f64)>,
}

fn text_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        None => true,
        Some(w) if w == WILDCARD => true,
        Some(w) => w == actual,
    }
}

/// Filters the company table and provides the values the filter
/// dropdowns are populated with.
pub struct FilterService;

impl FilterService {
    pub fn new() -> Self {
        Self
    }

    /// Tickers of companies matching every constraint, in table order.
    pub fn filter_tickers(&self, companies: &[CompanyMetadata], filter: &MetadataFilter) -> Vec<String> {
        companies
            .iter()
            .filter(|c| filter.matches(c))
            .map(|c| c.ticker.clone())
            .collect()
    }

    /// Distinct sectors, sorted.
    pub fn sectors(&self, companies: &[CompanyMetadata]) -> Vec<String> {
        Self::distinct(companies.iter().map(|c| c.sector.as_str()))
    }

    /// Distinct headquarters states, sorted.
    pub fn states(&self, companies: &[CompanyMetadata]) -> Vec<String> {
        Self::distinct(companies.iter().map(|c| c.headquarters_state.as_str()))
    }

    /// Distinct headquarters locations, sorted.
    pub fn locations(&self, companies: &[CompanyMetadata]) -> Vec<String> {
        Self::distinct(companies.iter().map(|c| c.headquarters_location.as_str()))
    }

    /// Smallest and largest market cap in the table.
    pub fn market_cap_bounds(&self, companies: &[CompanyMetadata]) -> Option<(f64, f64)> {
        let mut caps = companies.iter().map(|c| c.market_cap);
        let first = caps.next()?;
        Some(caps.fold((first, first), |(lo, hi), cap| (lo.min(cap), hi.max(cap))))
    }

    /// Dropdown values (each list gets `"All"` prepended by the frontend)
    /// and the cap bounds used as spin-box defaults.
    pub fn options(&self, companies: &[CompanyMetadata]) -> FilterOptions {
        FilterOptions {
            sectors: self.sectors(companies),
            states: self.states(companies),
            locations: self.locations(companies),
            market_cap_bounds: self.market_cap_bounds(companies),
        }
    }

    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut out: Vec<String> = values.map(str::to_string).collect();
        out.sort();
        out.dedup();
        out
    }
}

impl Default for FilterService {
    fn default() -> Self {
        Self::new()
    }
}
