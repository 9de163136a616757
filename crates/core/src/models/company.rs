use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Descriptive metadata for one listed company.
///
/// **Equality and hashing** are based solely on `ticker`. The metadata
/// table has one row per ticker; the other columns are only used for
/// filtering and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyMetadata {
    /// Ticker symbol, uppercased (e.g., "AAPL", "BRK.B")
    pub ticker: String,

    /// Human-readable company name (e.g., "Apple")
    pub name: String,

    /// Industry sector (e.g., "Technology")
    pub sector: String,

    /// Headquarters state (e.g., "California")
    pub headquarters_state: String,

    /// Headquarters city/location (e.g., "Cupertino")
    pub headquarters_location: String,

    /// Numeric market cap, taken from the leading number of `market_cap_label`
    pub market_cap: f64,

    /// Market cap as written in the source table (e.g., "2.5T")
    pub market_cap_label: String,
}

impl PartialEq for CompanyMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.ticker == other.ticker
    }
}

impl Eq for CompanyMetadata {}

impl std::hash::Hash for CompanyMetadata {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ticker.hash(state);
    }
}

impl CompanyMetadata {
    /// Build metadata from a formatted market cap string. Returns `None`
    /// when the string carries no number at all.
    pub fn new(
        ticker: impl Into<String>,
        name: impl Into<String>,
        sector: impl Into<String>,
        headquarters_state: impl Into<String>,
        headquarters_location: impl Into<String>,
        market_cap_label: impl Into<String>,
    ) -> Option<Self> {
        let market_cap_label = market_cap_label.into();
        let market_cap = parse_market_cap(&market_cap_label)?;
        Some(Self {
            ticker: ticker.into().trim().to_uppercase(),
            name: name.into(),
            sector: sector.into(),
            headquarters_state: headquarters_state.into(),
            headquarters_location: headquarters_location.into(),
            market_cap,
            market_cap_label,
        })
    }
}

/// First decimal number in a formatted market cap.
static MARKET_CAP_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").ok());

/// Extract the first decimal number from a formatted market cap string.
///
/// `"2.5T"` → 2.5, `"$512.3B"` → 512.3, `"1,024B"` → 1.0. Unit suffixes are
/// not applied and thousands separators end the number, so values are only
/// comparable when the whole table uses one unit.
pub fn parse_market_cap(raw: &str) -> Option<f64> {
    let pattern = MARKET_CAP_NUMBER.as_ref()?;
    let number = pattern.captures(raw)?.get(1)?;
    number.as_str().parse().ok()
}
