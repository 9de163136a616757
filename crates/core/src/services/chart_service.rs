use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::chart::{
    ChartPoint, ChartSeries, ComparisonChart, EventImpactChart, EventMarker, MarkerKind,
    PriceChart, YearlyBar, YearlyChangeChart,
};
use crate::models::dataset::Dataset;
use crate::models::event::{EventSortOrder, MarketEvent};
use crate::models::price::PricePoint;
use crate::models::settings::Settings;
use crate::services::event_service::EventService;
use crate::services::metrics_service::MetricsService;

pub const NO_DATA_FOR_CRITERIA: &str = "No data available for selected criteria";
pub const SELECT_STOCKS: &str = "Please select one or more stocks";
pub const NO_DATA_FOR_RANGE: &str = "No data available for the selected stocks and date range";

/// Share of a year category taken up by its group of bars.
const BAR_GROUP_WIDTH: f64 = 0.8;

/// Generates chart-ready view models from the dataset.
///
/// The core computes all the numbers and hover texts; the frontend only
/// renders. Each view is rebuilt from scratch on every call. A ticker
/// whose data cannot be charted is logged and left out; the others still
/// render.
pub struct ChartService {
    metrics_service: MetricsService,
    event_service: EventService,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            metrics_service: MetricsService::new(),
            event_service: EventService::new(),
        }
    }

    /// One ticker's full price history with the `[start_year, end_year]`
    /// window highlighted and the overlapping events marked.
    pub fn price_chart(
        &self,
        dataset: &Dataset,
        settings: &Settings,
        ticker: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<PriceChart, CoreError> {
        let series = dataset
            .series(ticker)
            .ok_or_else(|| CoreError::TickerNotFound(ticker.to_string()))?;
        let company_name = company_name(dataset, settings, series.ticker());

        let cumulative_return = self
            .metrics_service
            .cumulative_return(series, start_year, end_year);
        let cumulative_gain_label = match cumulative_return {
            Some(gain) => format!("Cumulative Gain: {gain:.2}%"),
            None => "Cumulative Gain: N/A".to_string(),
        };

        let markers = self
            .event_service
            .overlapping(dataset.events(), start_year, end_year)
            .into_iter()
            .map(|event| EventMarker {
                name: event.name.clone(),
                kind: marker_kind(event),
                start: event.start,
                end: event.end,
                tooltip: event.tooltip(),
                label_height: None,
            })
            .collect();

        Ok(PriceChart {
            title: format!("Closing Prices for {company_name} ({})", series.ticker()),
            ticker: series.ticker().to_string(),
            company_name,
            series: ChartSeries {
                ticker: series.ticker().to_string(),
                label: series.ticker().to_string(),
                points: to_chart_points(series.points()),
                cumulative_return,
            },
            highlighted: to_chart_points(series.year_range(start_year, end_year)),
            markers,
            cumulative_gain_label,
        })
    }

    /// Closing prices of several tickers over `[start_year, end_year]`,
    /// each with its cumulative return over that window.
    pub fn comparison_chart(
        &self,
        dataset: &Dataset,
        tickers: &[String],
        start_year: i32,
        end_year: i32,
    ) -> ComparisonChart {
        let mut lines = Vec::new();

        for ticker in tickers {
            let Some(series) = dataset.series(ticker) else {
                debug!("No price data loaded for {ticker}");
                continue;
            };
            let window = series.year_range(start_year, end_year);
            if window.is_empty() {
                continue;
            }
            let Some(cumulative_return) =
                self.metrics_service
                    .cumulative_return(series, start_year, end_year)
            else {
                warn!("Cannot compute cumulative return for {ticker}: first close is zero");
                continue;
            };

            lines.push(ChartSeries {
                ticker: series.ticker().to_string(),
                label: series.ticker().to_string(),
                points: to_chart_points(window),
                cumulative_return: Some(cumulative_return),
            });
        }

        let title = if lines.is_empty() {
            NO_DATA_FOR_CRITERIA
        } else {
            "Closing Prices for Selected Stocks"
        };

        ComparisonChart {
            title: title.to_string(),
            series: lines,
        }
    }

    /// Grouped bars of yearly percentage change, one group per year and
    /// one bar per ticker, for the years in `[start_year, end_year]`.
    ///
    /// Changes are computed over the whole series before the window is
    /// applied, so the first year in the window still compares against
    /// the year before it.
    pub fn yearly_change_chart(
        &self,
        dataset: &Dataset,
        settings: &Settings,
        tickers: &[String],
        start_year: i32,
        end_year: i32,
    ) -> YearlyChangeChart {
        let in_window = |year: i32| year >= start_year && year <= end_year;
        let mut per_ticker = Vec::new();
        let mut years: Vec<i32> = Vec::new();
        for ticker in tickers {
            let Some(series) = dataset.series(ticker) else {
                debug!("No price data loaded for {ticker}");
                continue;
            };
            // A ticker with a year-end close in the window takes a bar slot
            // and its years become categories, even where no change exists
            // (its first year, or a zero baseline).
            let ticker_years: Vec<i32> = series.years().into_iter().filter(|y| in_window(*y)).collect();
            if ticker_years.is_empty() {
                continue;
            }
            years.extend(ticker_years);
            let changes: Vec<_> = self
                .metrics_service
                .yearly_changes(series)
                .into_iter()
                .filter(|c| in_window(c.year))
                .filter(|c| c.pct_change.is_finite() && c.cumulative_return.is_finite())
                .collect();
            per_ticker.push((series.ticker().to_string(), changes));
        }

        if per_ticker.is_empty() {
            return YearlyChangeChart {
                title: NO_DATA_FOR_CRITERIA.to_string(),
                years: Vec::new(),
                bar_width: 0.0,
                tickers: Vec::new(),
                bars: Vec::new(),
            };
        }

        years.sort_unstable();
        years.dedup();

        let n = per_ticker.len() as f64;
        let bar_width = BAR_GROUP_WIDTH / n;

        let mut bars = Vec::new();
        for (i, (ticker, changes)) in per_ticker.iter().enumerate() {
            let offset = (i as f64 - n / 2.0) * bar_width;
            let name = company_name(dataset, settings, ticker);
            for change in changes {
                let Ok(category) = years.binary_search(&change.year) else {
                    continue;
                };
                bars.push(YearlyBar {
                    ticker: ticker.clone(),
                    year: change.year,
                    x: category as f64 + offset,
                    yearly_change: change.pct_change,
                    cumulative_return: change.cumulative_return,
                    tooltip: format!(
                        "Company: {name}\nTicker: {ticker}\nYear: {}\nYearly Change: {:.1}%\nCumulative Return: {:.1}%",
                        change.year, change.pct_change, change.cumulative_return
                    ),
                });
            }
        }

        YearlyChangeChart {
            title: "Yearly Price Change by Ticker".to_string(),
            years,
            bar_width,
            tickers: per_ticker.into_iter().map(|(t, _)| t).collect(),
            bars,
        }
    }

    /// Normalized price moves of the selected tickers around the selected
    /// events, with event markers and the impact table.
    pub fn event_impact_chart(
        &self,
        dataset: &Dataset,
        tickers: &[String],
        event_names: &[String],
    ) -> Result<EventImpactChart, CoreError> {
        const TITLE: &str = "Stock Price Changes During Market Events";

        if tickers.is_empty() {
            return Ok(placeholder(TITLE, SELECT_STOCKS));
        }

        let selected = self.event_service.resolve(dataset, event_names)?;
        let Some((window_start, window_end)) =
            self.event_service.selection_window(dataset, &selected)
        else {
            return Ok(placeholder(TITLE, NO_DATA_FOR_RANGE));
        };

        // never start before the earliest data of the selected tickers
        let earliest_data = tickers
            .iter()
            .filter_map(|t| dataset.series(t))
            .filter_map(|s| s.start_date())
            .min();
        let effective_start = match earliest_data {
            Some(earliest) => window_start.max(earliest),
            None => window_start,
        };

        let mut lines = Vec::new();
        for ticker in tickers {
            let Some(series) = dataset.series(ticker) else {
                debug!("No price data loaded for {ticker}");
                continue;
            };
            match self
                .metrics_service
                .normalized(series, effective_start, window_end)
            {
                Ok(points) if points.is_empty() => {
                    debug!("No data available for {ticker} in the selected date range");
                }
                Ok(points) => lines.push(ChartSeries {
                    ticker: series.ticker().to_string(),
                    label: series.ticker().to_string(),
                    cumulative_return: points.last().map(|p| p.value),
                    points,
                }),
                Err(e) => warn!("Error plotting {ticker}: {e}"),
            }
        }

        if lines.is_empty() {
            return Ok(placeholder(TITLE, NO_DATA_FOR_RANGE));
        }

        let mut markers = Vec::new();
        for event in self.event_service.sorted(&selected, EventSortOrder::StartAsc) {
            let (highlight_start, highlight_end) = event.highlight_span();
            if highlight_end < effective_start {
                continue;
            }
            markers.push(EventMarker {
                name: event.name.clone(),
                kind: marker_kind(event),
                start: highlight_start.max(effective_start),
                end: highlight_end,
                tooltip: event.tooltip(),
                label_height: None,
            });
        }
        let heights = self.event_service.stagger_labels(markers.len());
        for (marker, height) in markers.iter_mut().zip(heights) {
            marker.label_height = Some(height);
        }

        let impact_table = self
            .metrics_service
            .impact_table(dataset, tickers, &selected);

        Ok(EventImpactChart {
            title: TITLE.to_string(),
            placeholder: None,
            window: Some((effective_start, window_end)),
            series: lines,
            markers,
            impact_table: Some(impact_table),
        })
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Display name for a ticker: metadata table first, then the configured
/// ticker list.
pub fn company_name(dataset: &Dataset, settings: &Settings, ticker: &str) -> String {
    dataset
        .company(ticker)
        .map(|c| c.name.clone())
        .or_else(|| settings.ticker_name(ticker).map(str::to_string))
        .unwrap_or_else(|| "Unknown Company".to_string())
}

fn marker_kind(event: &MarketEvent) -> MarkerKind {
    if event.is_single_day() {
        MarkerKind::Line
    } else {
        MarkerKind::Span
    }
}

fn to_chart_points(points: &[PricePoint]) -> Vec<ChartPoint> {
    points
        .iter()
        .map(|p| ChartPoint {
            date: p.date,
            value: p.close,
        })
        .collect()
}

fn placeholder(title: &str, message: &str) -> EventImpactChart {
    EventImpactChart {
        title: title.to_string(),
        placeholder: Some(message.to_string()),
        window: None,
        series: Vec::new(),
        markers: Vec::new(),
        impact_table: None,
    }
}
