//! Command-line arguments for `stock-events`.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tickers` | List loaded tickers as "TICKER - Company" |
//! | `events` | List market events, optionally only those overlapping a year window, in a chosen order |
//! | `filters` | Show the sector/state/location values and market cap bounds |
//! | `metrics` | Cumulative return, extremes and yearly changes of one ticker |
//! | `price` | Single-ticker price chart with events |
//! | `compare` | Price lines of every ticker passing a metadata filter |
//! | `yearly` | Yearly change bars of every ticker passing a metadata filter |
//! | `impact` | Normalized moves and impact table around selected events |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stock_events_core::models::event::EventSortOrder;
use stock_events_core::services::filter_service::MetadataFilter;

#[derive(Debug, Parser)]
#[command(
    name = "stock-events",
    version,
    about = "Chart data for historical stock prices annotated with market events"
)]
pub struct Cli {
    /// JSON settings file (data directory, file names, tickers, year bounds).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the data directory from the settings.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Fail when any input file cannot be read instead of continuing without it.
    #[arg(long, global = true)]
    pub strict_load: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List loaded tickers.
    Tickers,

    /// List market events.
    Events {
        #[command(flatten)]
        years: YearArgs,

        /// Listing order; table order when omitted.
        #[arg(long, value_enum)]
        sort: Option<EventSortArg>,
    },

    /// Show the values available to the metadata filters.
    Filters,

    /// Metrics of a single ticker.
    Metrics {
        ticker: String,
        #[command(flatten)]
        years: YearArgs,
    },

    /// Price chart of a single ticker.
    Price {
        ticker: String,
        #[command(flatten)]
        years: YearArgs,
    },

    /// Compare closing prices of the tickers passing a filter.
    Compare {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        years: YearArgs,
    },

    /// Yearly percentage change of the tickers passing a filter.
    Yearly {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        years: YearArgs,
    },

    /// Price moves of selected tickers around selected events.
    Impact {
        /// Ticker to include (repeatable).
        #[arg(long = "ticker", short = 't')]
        tickers: Vec<String>,

        /// Event name to include (repeatable).
        #[arg(long = "event", short = 'e')]
        events: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventSortArg {
    /// Earliest start first
    Start,
    /// Latest start first
    StartDesc,
    /// Alphabetical by name
    Name,
    /// Longest span first
    Duration,
}

impl From<EventSortArg> for EventSortOrder {
    fn from(arg: EventSortArg) -> Self {
        match arg {
            EventSortArg::Start => EventSortOrder::StartAsc,
            EventSortArg::StartDesc => EventSortOrder::StartDesc,
            EventSortArg::Name => EventSortOrder::NameAsc,
            EventSortArg::Duration => EventSortOrder::DurationDesc,
        }
    }
}

/// Year window; unset bounds fall back to the configured range.
#[derive(Debug, Clone, Default, Args)]
pub struct YearArgs {
    /// First year of the window.
    #[arg(long = "from")]
    pub start_year: Option<i32>,

    /// Last year of the window.
    #[arg(long = "to")]
    pub end_year: Option<i32>,
}

impl YearArgs {
    pub fn is_set(&self) -> bool {
        self.start_year.is_some() || self.end_year.is_some()
    }

    pub fn resolve(&self, min_year: i32, max_year: i32) -> (i32, i32) {
        (
            self.start_year.unwrap_or(min_year),
            self.end_year.unwrap_or(max_year),
        )
    }
}

/// Company metadata filter. "All" or an omitted flag leaves a column unconstrained.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub sector: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Smallest market cap to include.
    #[arg(long)]
    pub min_cap: Option<f64>,

    /// Largest market cap to include.
    #[arg(long)]
    pub max_cap: Option<f64>,
}

impl From<&FilterArgs> for MetadataFilter {
    fn from(args: &FilterArgs) -> Self {
        MetadataFilter {
            sector: args.sector.clone(),
            state: args.state.clone(),
            location: args.location.clone(),
            min_cap: args.min_cap,
            max_cap: args.max_cap,
        }
    }
}
