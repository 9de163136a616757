use chrono::NaiveDate;
use stock_events_core::models::company::{parse_market_cap, CompanyMetadata};
use stock_events_core::models::event::MarketEvent;
use stock_events_core::models::metrics::{CellTone, EventImpact, ImpactRow, ImpactTable};
use stock_events_core::models::price::{PricePoint, PriceSeries};
use stock_events_core::models::settings::{default_tickers, Settings, TickerInfo};
use std::collections::HashSet;
use std::path::PathBuf;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn p(y: i32, m: u32, day: u32, close: f64) -> PricePoint {
    PricePoint::new(d(y, m, day), close)
}

// ═══════════════════════════════════════════════════════════════════
//  PriceSeries
// ═══════════════════════════════════════════════════════════════════

mod price_series {
    use super::*;

    fn sample() -> PriceSeries {
        PriceSeries::new(
            "AAPL",
            vec![
                p(2019, 12, 31, 90.0),
                p(2020, 1, 2, 100.0),
                p(2020, 6, 15, 120.0),
                p(2020, 12, 31, 150.0),
                p(2021, 3, 1, 140.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_accepts_increasing_dates() {
        let s = sample();
        assert_eq!(s.ticker(), "AAPL");
        assert_eq!(s.len(), 5);
        assert!(!s.is_empty());
        assert_eq!(s.start_date(), Some(d(2019, 12, 31)));
        assert_eq!(s.end_date(), Some(d(2021, 3, 1)));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let err = PriceSeries::new("X", vec![p(2020, 1, 2, 1.0), p(2020, 1, 2, 2.0)]).unwrap_err();
        assert!(err.to_string().contains("not strictly increasing"));
    }

    #[test]
    fn new_rejects_unsorted_dates() {
        assert!(PriceSeries::new("X", vec![p(2020, 1, 3, 1.0), p(2020, 1, 2, 2.0)]).is_err());
    }

    #[test]
    fn from_unsorted_sorts_and_keeps_first_duplicate() {
        let (s, dropped) = PriceSeries::from_unsorted(
            "X",
            vec![
                p(2020, 1, 3, 3.0),
                p(2020, 1, 2, 2.0),
                p(2020, 1, 3, 99.0),
                p(2020, 1, 1, 1.0),
            ],
        );
        assert_eq!(dropped, 1);
        let closes: Vec<f64> = s.points().iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_series_has_no_bounds() {
        let s = PriceSeries::new("X", vec![]).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.start_date(), None);
        assert!(s.years().is_empty());
    }

    #[test]
    fn range_is_inclusive() {
        let s = sample();
        let r = s.range(d(2020, 1, 2), d(2020, 12, 31));
        assert_eq!(r.len(), 3);
        assert_eq!(r[0].close, 100.0);
        assert_eq!(r[2].close, 150.0);
    }

    #[test]
    fn range_between_observations() {
        let s = sample();
        let r = s.range(d(2020, 1, 3), d(2020, 6, 14));
        assert!(r.is_empty());
    }

    #[test]
    fn range_inverted_is_empty() {
        assert!(sample().range(d(2021, 1, 1), d(2020, 1, 1)).is_empty());
    }

    #[test]
    fn year_range_selects_calendar_years() {
        let s = sample();
        let r = s.year_range(2020, 2020);
        assert_eq!(r.len(), 3);
        assert_eq!(s.year_range(2019, 2021).len(), 5);
        assert!(s.year_range(2022, 2030).is_empty());
        assert!(s.year_range(2021, 2019).is_empty());
    }

    #[test]
    fn years_are_distinct_and_ascending() {
        assert_eq!(sample().years(), vec![2019, 2020, 2021]);
    }

    #[test]
    fn deserialize_keeps_valid_series() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: PriceSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn deserialize_rejects_unsorted_and_duplicate_dates() {
        let json = r#"{"ticker":"AAPL","points":[
            {"date":"2021-06-01","close":200.0},
            {"date":"2020-01-01","close":100.0},
            {"date":"2020-01-01","close":300.0}
        ]}"#;
        let err = serde_json::from_str::<PriceSeries>(json).unwrap_err();
        assert!(err.to_string().contains("not strictly increasing"));

        let duplicate = r#"{"ticker":"AAPL","points":[
            {"date":"2020-01-01","close":100.0},
            {"date":"2020-01-01","close":300.0}
        ]}"#;
        assert!(serde_json::from_str::<PriceSeries>(duplicate).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MarketEvent
// ═══════════════════════════════════════════════════════════════════

mod market_event {
    use super::*;

    #[test]
    fn new_rejects_end_before_start() {
        let err = MarketEvent::new("Oops", d(2020, 3, 2), d(2020, 3, 1)).unwrap_err();
        assert!(err.to_string().contains("Oops"));
    }

    #[test]
    fn deserialize_rejects_end_before_start() {
        let json = r#"{"name":"Backwards","start":"2021-01-01","end":"2020-01-01"}"#;
        let err = serde_json::from_str::<MarketEvent>(json).unwrap_err();
        assert!(err.to_string().contains("Backwards"));

        let ok = r#"{"name":"Flash","start":"2020-03-01","end":"2020-03-01"}"#;
        let event: MarketEvent = serde_json::from_str(ok).unwrap();
        assert_eq!(event, MarketEvent::single_day("Flash", d(2020, 3, 1)));
    }

    #[test]
    fn single_day_detection() {
        let e = MarketEvent::single_day("Black Monday", d(1987, 10, 19));
        assert!(e.is_single_day());
        assert_eq!(e.duration_days(), 1);

        let span = MarketEvent::new("COVID-19 Crash", d(2020, 2, 20), d(2020, 4, 7)).unwrap();
        assert!(!span.is_single_day());
        assert_eq!(span.duration_days(), 48);
    }

    #[test]
    fn overlap_is_year_granular() {
        let e = MarketEvent::new("Dot-com", d(2000, 3, 10), d(2002, 10, 9)).unwrap();
        assert!(e.overlaps_years(2002, 2005));
        assert!(e.overlaps_years(1995, 2000));
        assert!(e.overlaps_years(2001, 2001));
        assert!(!e.overlaps_years(2003, 2010));
        assert!(!e.overlaps_years(1990, 1999));
    }

    #[test]
    fn impact_window_widens_single_day() {
        let e = MarketEvent::single_day("Flash", d(2020, 3, 1));
        assert_eq!(e.impact_window(), (d(2020, 2, 29), d(2020, 3, 2)));
    }

    #[test]
    fn impact_window_of_span_is_unchanged() {
        let e = MarketEvent::new("Span", d(2020, 3, 1), d(2020, 3, 10)).unwrap();
        assert_eq!(e.impact_window(), (d(2020, 3, 1), d(2020, 3, 10)));
    }

    #[test]
    fn context_window_adds_three_weeks() {
        let e = MarketEvent::single_day("Flash", d(2010, 5, 6));
        assert_eq!(e.context_window(), (d(2010, 4, 15), d(2010, 5, 27)));
    }

    #[test]
    fn highlight_span_of_single_day_is_one_day_wide() {
        let e = MarketEvent::single_day("Flash", d(2010, 5, 6));
        assert_eq!(e.highlight_span(), (d(2010, 5, 6), d(2010, 5, 7)));
    }

    #[test]
    fn tooltip_single_day() {
        let e = MarketEvent::single_day("Black Monday", d(1987, 10, 19));
        assert_eq!(e.tooltip(), "Event: Black Monday\nDate: 1987-10-19");
    }

    #[test]
    fn tooltip_period() {
        let e = MarketEvent::new("GFC", d(2007, 10, 9), d(2009, 3, 9)).unwrap();
        assert_eq!(
            e.tooltip(),
            "Event: GFC\nPeriod: 2007-10-09 to\n        2009-03-09"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
//  CompanyMetadata
// ═══════════════════════════════════════════════════════════════════

mod company_metadata {
    use super::*;

    fn apple() -> CompanyMetadata {
        CompanyMetadata::new(" aapl ", "Apple", "Technology", "California", "Cupertino", "3.4T")
            .unwrap()
    }

    #[test]
    fn new_normalizes_ticker_and_parses_cap() {
        let c = apple();
        assert_eq!(c.ticker, "AAPL");
        assert_eq!(c.market_cap, 3.4);
        assert_eq!(c.market_cap_label, "3.4T");
    }

    #[test]
    fn new_without_number_is_none() {
        assert!(CompanyMetadata::new("X", "X", "S", "ST", "L", "n/a").is_none());
    }

    #[test]
    fn equality_uses_ticker_only() {
        let a = apple();
        let mut b = apple();
        b.sector = "Other".into();
        b.market_cap = 1.0;
        assert_eq!(a, b);

        let set: HashSet<CompanyMetadata> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn parse_market_cap_formats() {
        assert_eq!(parse_market_cap("2.5T"), Some(2.5));
        assert_eq!(parse_market_cap("$512.3B"), Some(512.3));
        assert_eq!(parse_market_cap("1,024B"), Some(1.0));
        assert_eq!(parse_market_cap("  874 "), Some(874.0));
        assert_eq!(parse_market_cap("7."), Some(7.0));
        assert_eq!(parse_market_cap("none"), None);
        assert_eq!(parse_market_cap(""), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Metrics models
// ═══════════════════════════════════════════════════════════════════

mod metrics_models {
    use super::*;

    #[test]
    fn impact_display() {
        assert_eq!(EventImpact::Change(-12.345).to_string(), "-12.35%");
        assert_eq!(EventImpact::Change(3.0).to_string(), "3.00%");
        assert_eq!(EventImpact::NotAvailable.to_string(), "N/A");
    }

    #[test]
    fn impact_tone() {
        assert_eq!(EventImpact::Change(1.0).tone(), CellTone::Positive);
        assert_eq!(EventImpact::Change(-1.0).tone(), CellTone::Negative);
        assert_eq!(EventImpact::Change(0.0).tone(), CellTone::Neutral);
        assert_eq!(EventImpact::NotAvailable.tone(), CellTone::NotAvailable);
        assert_eq!(EventImpact::NotAvailable.value(), None);
        assert_eq!(EventImpact::Change(2.0).value(), Some(2.0));
    }

    #[test]
    fn impact_table_text_rows() {
        let table = ImpactTable {
            header: vec!["Event".into(), "AAPL".into(), "MSFT".into()],
            rows: vec![ImpactRow {
                event: "Crash".into(),
                cells: vec![EventImpact::Change(-20.0), EventImpact::NotAvailable],
            }],
        };
        assert_eq!(
            table.to_text_rows(),
            vec![
                vec!["Event", "AAPL", "MSFT"],
                vec!["Crash", "-20.00%", "N/A"],
            ]
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.data_dir, PathBuf::from("data"));
        assert_eq!(s.min_year, 1980);
        assert_eq!(s.max_year, 2024);
        assert_eq!(s.tickers.len(), 24);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn default_tickers_are_uppercase_and_unique() {
        let tickers = default_tickers();
        let unique: HashSet<&str> = tickers.iter().map(|t| t.ticker.as_str()).collect();
        assert_eq!(unique.len(), tickers.len());
        assert!(tickers.iter().all(|t| t.ticker == t.ticker.to_uppercase()));
    }

    #[test]
    fn paths_are_joined_to_data_dir() {
        let s = Settings {
            data_dir: PathBuf::from("/srv/prices"),
            ..Settings::default()
        };
        assert_eq!(
            s.price_path("MSFT"),
            PathBuf::from("/srv/prices/MacroTrends_Data_Download_MSFT.csv")
        );
        assert_eq!(
            s.events_path(),
            PathBuf::from("/srv/prices/stock_market_events_with_dates.csv")
        );
        assert_eq!(s.metadata_path(), PathBuf::from("/srv/prices/top_25_us_stocks.csv"));
    }

    #[test]
    fn ticker_name_is_case_insensitive() {
        let s = Settings::default();
        assert_eq!(s.ticker_name("aapl"), Some("Apple"));
        assert_eq!(s.ticker_name("brk.b"), Some("Berkshire Hathaway B"));
        assert_eq!(s.ticker_name("ZZZZ"), None);
    }

    #[test]
    fn validate_rejects_inverted_years() {
        let s = Settings {
            min_year: 2025,
            max_year: 2020,
            ..Settings::default()
        };
        assert!(s.validate().unwrap_err().to_string().contains("Configuration error"));
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let s = Settings {
            price_file_template: "prices.csv".into(),
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn partial_json_takes_defaults() {
        let s: Settings = serde_json::from_str(r#"{"data_dir": "/tmp/x", "min_year": 2000}"#).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("/tmp/x"));
        assert_eq!(s.min_year, 2000);
        assert_eq!(s.max_year, 2024);
        assert_eq!(s.tickers.len(), 24);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"tickers": [{"ticker": "AAPL", "name": "Apple"}], "max_year": 2030}"#,
        )
        .unwrap();
        let s = Settings::load_from_file(&path).unwrap();
        assert_eq!(s.tickers, vec![TickerInfo::new("AAPL", "Apple")]);
        assert_eq!(s.max_year, 2030);
    }

    #[test]
    fn load_from_file_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Settings::load_from_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let err = Settings::load_from_file("/nonexistent/settings.json").unwrap_err();
        assert!(err.to_string().starts_with("File I/O error"));
    }

    #[test]
    fn ticker_info_label() {
        let t = TickerInfo::new("nvda", "NVIDIA");
        assert_eq!(t.ticker, "NVDA");
        assert_eq!(t.label(), "NVDA - NVIDIA");
    }
}
