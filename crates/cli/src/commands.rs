use serde::Serialize;
use stock_events_core::models::event::MarketEvent;
use stock_events_core::models::metrics::{Extremes, YearlyChange};
use stock_events_core::models::settings::Settings;
use stock_events_core::services::filter_service::MetadataFilter;
use stock_events_core::MarketExplorer;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::render;

/// Everything the `metrics` command reports for one ticker.
#[derive(Debug, Serialize)]
pub struct TickerMetrics {
    pub ticker: String,
    pub company_name: String,
    pub start_year: i32,
    pub end_year: i32,
    pub cumulative_return: Option<f64>,
    pub extremes: Option<Extremes>,
    pub yearly_changes: Vec<YearlyChange>,
}

pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = match &cli.config {
        Some(path) => {
            info!("Reading settings from {}", path.display());
            Settings::load_from_file(path)?
        }
        None => Settings::default(),
    };
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    settings.validate()?;
    Ok(settings)
}

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = load_settings(cli)?;
    let explorer = if cli.strict_load {
        MarketExplorer::load_strict(settings)?
    } else {
        MarketExplorer::load(settings)
    };
    let (min_year, max_year) = (explorer.settings().min_year, explorer.settings().max_year);

    match &cli.command {
        Command::Tickers => render(&explorer.ticker_labels(), cli.format, cli.pretty),

        Command::Events { years, sort } => {
            let mut selected: Vec<&MarketEvent> = if years.is_set() {
                let (start, end) = years.resolve(min_year, max_year);
                explorer.overlapping_events(start, end)
            } else {
                explorer.dataset().events().iter().collect()
            };
            if let Some(order) = sort {
                selected = explorer.sorted_events(&selected, (*order).into());
            }
            let events: Vec<MarketEvent> = selected.into_iter().cloned().collect();
            render(&events, cli.format, cli.pretty)
        }

        Command::Filters => render(&explorer.filter_options(), cli.format, cli.pretty),

        Command::Metrics { ticker, years } => {
            let (start_year, end_year) = years.resolve(min_year, max_year);
            let metrics = TickerMetrics {
                ticker: ticker.to_uppercase(),
                company_name: explorer.company_name(ticker),
                start_year,
                end_year,
                cumulative_return: explorer.cumulative_return(ticker, start_year, end_year)?,
                extremes: explorer.extremes(ticker, start_year, end_year)?,
                yearly_changes: explorer
                    .yearly_changes(ticker)?
                    .into_iter()
                    .filter(|c| c.year >= start_year && c.year <= end_year)
                    .collect(),
            };
            render(&metrics, cli.format, cli.pretty)
        }

        Command::Price { ticker, years } => {
            let (start, end) = years.resolve(min_year, max_year);
            let chart = explorer.price_chart(ticker, start, end)?;
            render(&chart, cli.format, cli.pretty)
        }

        Command::Compare { filter, years } => {
            let (start, end) = years.resolve(min_year, max_year);
            let chart = explorer.comparison_chart(&MetadataFilter::from(filter), start, end)?;
            render(&chart, cli.format, cli.pretty)
        }

        Command::Yearly { filter, years } => {
            let (start, end) = years.resolve(min_year, max_year);
            let chart = explorer.yearly_change_chart(&MetadataFilter::from(filter), start, end)?;
            render(&chart, cli.format, cli.pretty)
        }

        Command::Impact { tickers, events } => {
            let chart = explorer.event_impact_chart(tickers, events)?;
            render(&chart, cli.format, cli.pretty)
        }
    }
}
