// ═══════════════════════════════════════════════════════════════════
// Loader Tests — date parsing, CSV directory source, in-memory source,
// strict and lenient dataset loading
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::path::Path;

use stock_events_core::errors::CoreError;
use stock_events_core::loader::csv_source::CsvDirectorySource;
use stock_events_core::loader::dates::parse_date;
use stock_events_core::loader::memory::InMemorySource;
use stock_events_core::loader::traits::DataSource;
use stock_events_core::models::company::CompanyMetadata;
use stock_events_core::models::dataset::Dataset;
use stock_events_core::models::event::MarketEvent;
use stock_events_core::models::price::PricePoint;
use stock_events_core::models::settings::{Settings, TickerInfo};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn settings_for(dir: &Path, tickers: &[(&str, &str)]) -> Settings {
    Settings {
        data_dir: dir.to_path_buf(),
        tickers: tickers.iter().map(|(t, n)| TickerInfo::new(*t, *n)).collect(),
        ..Settings::default()
    }
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

const EVENTS_CSV: &str = "\
Event,Start Date,End Date
Black Monday,1987-10-19,1987-10-19
COVID-19 Crash,2020-02-20,2020-03-23
Backwards,2020-05-01,2020-04-01
Garbled,not a date,2020-01-01
";

const METADATA_CSV: &str = "\
Ticker,Name,Sector,Headquarters State,Headquarters Location,Market Cap
AAPL,Apple Inc.,Technology,California,Cupertino,3.4T
msft,,Technology,Washington,Redmond,$3.1T
XOM,ExxonMobil,Energy,Texas,Spring,unknown
";

// ── Date parsing ────────────────────────────────────────────────────

mod dates {
    use super::*;

    #[test]
    fn accepts_common_formats() {
        assert_eq!(parse_date("2020-03-01").unwrap(), d(2020, 3, 1));
        assert_eq!(parse_date("2020/03/01").unwrap(), d(2020, 3, 1));
        assert_eq!(parse_date("03/01/2020").unwrap(), d(2020, 3, 1));
        assert_eq!(parse_date("01.03.2020").unwrap(), d(2020, 3, 1));
        assert_eq!(parse_date(" 2020-03-01 ").unwrap(), d(2020, 3, 1));
    }

    #[test]
    fn discards_time_of_day() {
        assert_eq!(parse_date("2020-03-01 16:00:00").unwrap(), d(2020, 3, 1));
        assert_eq!(parse_date("2020-03-01T09:30:00").unwrap(), d(2020, 3, 1));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_date("yesterday").unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate(ref s) if s == "yesterday"));
        assert!(parse_date("2020-02-30").is_err());
    }
}

// ── CSV directory source ────────────────────────────────────────────

mod csv_source {
    use super::*;

    #[test]
    fn loads_price_file_with_preamble_and_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "MacroTrends_Data_Download_AAPL.csv",
            "\
Data provided for informational purposes only.
Use at your own risk.

date,open,high,low,close,volume
2020-01-03,1,1,1,101.5,10
2020-01-02,1,1,1,\"1,000.25\",10
2020-01-06,1,1,1,,10
bad-date,1,1,1,99,10
2020-01-03,1,1,1,555,10
",
        );
        let source = CsvDirectorySource::new(settings_for(dir.path(), &[("AAPL", "Apple")]));
        let series = source.load_series("AAPL").unwrap();

        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(
            series.points(),
            &[
                PricePoint::new(d(2020, 1, 2), 1000.25),
                PricePoint::new(d(2020, 1, 3), 101.5),
            ]
        );
    }

    #[test]
    fn quoted_disclaimer_with_commas_is_not_a_header() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "MacroTrends_Data_Download_NVDA.csv",
            "\
\"Note: columns are ,date,close, in USD\"
\"Disclaimer, terms apply\",see site
date,close
2024-01-02,48.17
2024-01-03,47.57
",
        );
        let source = CsvDirectorySource::new(settings_for(dir.path(), &[("NVDA", "NVIDIA")]));
        let series = source.load_series("NVDA").unwrap();
        assert_eq!(
            series.points(),
            &[
                PricePoint::new(d(2024, 1, 2), 48.17),
                PricePoint::new(d(2024, 1, 3), 47.57),
            ]
        );
    }

    #[test]
    fn price_headers_are_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "MacroTrends_Data_Download_MSFT.csv",
            "Date,Close\n2021-01-04,217.69\n",
        );
        let source = CsvDirectorySource::new(settings_for(dir.path(), &[("MSFT", "Microsoft")]));
        assert_eq!(source.load_series("MSFT").unwrap().len(), 1);
    }

    #[test]
    fn missing_price_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDirectorySource::new(settings_for(dir.path(), &[]));
        let err = source.load_series("NOPE").unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }

    #[test]
    fn events_skip_invalid_rows() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "stock_market_events_with_dates.csv", EVENTS_CSV);
        let source = CsvDirectorySource::new(settings_for(dir.path(), &[]));
        let events = source.load_events().unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], MarketEvent::single_day("Black Monday", d(1987, 10, 19)));
        assert_eq!(events[1].name, "COVID-19 Crash");
        assert_eq!(events[1].end, d(2020, 3, 23));
    }

    #[test]
    fn events_missing_column_fail_the_table() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "stock_market_events_with_dates.csv",
            "Event,Start Date\nCrash,2020-01-01\n",
        );
        let source = CsvDirectorySource::new(settings_for(dir.path(), &[]));
        let err = source.load_events().unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecord { row: 1, .. }));
    }

    #[test]
    fn companies_with_name_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "top_25_us_stocks.csv", METADATA_CSV);
        let source = CsvDirectorySource::new(settings_for(dir.path(), &[("MSFT", "Microsoft")]));
        let companies = source.load_companies().unwrap();

        // XOM has no numeric market cap
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "Apple Inc.");
        assert_eq!(companies[0].headquarters_location, "Cupertino");
        assert_eq!(companies[1].ticker, "MSFT");
        assert_eq!(companies[1].name, "Microsoft");
        assert_eq!(companies[1].market_cap, 3.1);
        assert_eq!(companies[1].market_cap_label, "$3.1T");
    }
}

// ── In-memory source ────────────────────────────────────────────────

mod memory_source {
    use super::*;

    #[test]
    fn series_are_sorted_and_keyed_case_insensitively() {
        let source = InMemorySource::new().with_series(
            "aapl",
            vec![
                PricePoint::new(d(2020, 1, 3), 2.0),
                PricePoint::new(d(2020, 1, 2), 1.0),
            ],
        );
        let series = source.load_series("AAPL").unwrap();
        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(series.start_date(), Some(d(2020, 1, 2)));
        assert_eq!(source.name(), "memory");
    }

    #[test]
    fn unknown_ticker() {
        let err = InMemorySource::new().load_series("X").unwrap_err();
        assert!(matches!(err, CoreError::TickerNotFound(_)));
    }
}

// ── Dataset loading ─────────────────────────────────────────────────

mod dataset_loading {
    use super::*;

    fn source() -> InMemorySource {
        InMemorySource::new()
            .with_series("AAPL", vec![PricePoint::new(d(2020, 1, 2), 100.0)])
            .with_event(MarketEvent::single_day("Flash", d(2020, 1, 2)))
            .with_company(
                CompanyMetadata::new("AAPL", "Apple", "Technology", "California", "Cupertino", "3T")
                    .unwrap(),
            )
    }

    #[test]
    fn strict_load_fails_on_missing_ticker() {
        let tickers = vec![TickerInfo::new("AAPL", "Apple"), TickerInfo::new("MSFT", "Microsoft")];
        let err = Dataset::load(&source(), &tickers).unwrap_err();
        assert!(matches!(err, CoreError::TickerNotFound(t) if t == "MSFT"));
    }

    #[test]
    fn lenient_load_skips_missing_ticker() {
        let tickers = vec![TickerInfo::new("AAPL", "Apple"), TickerInfo::new("MSFT", "Microsoft")];
        let ds = Dataset::load_lenient(&source(), &tickers);
        assert_eq!(ds.tickers(), vec!["AAPL"]);
        assert_eq!(ds.events().len(), 1);
        assert_eq!(ds.companies().len(), 1);
        assert!(ds.series("aapl").is_some());
        assert!(ds.company("Aapl").is_some());
        assert!(ds.event("Flash").is_some());
        assert!(ds.event("flash").is_none());
    }

    #[test]
    fn lenient_load_of_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDirectorySource::new(settings_for(dir.path(), &[("AAPL", "Apple")]));
        let ds = Dataset::load_lenient(&source, &source.settings().tickers);
        assert!(ds.is_empty());
    }

    #[test]
    fn dataset_serializes() {
        let ds = Dataset::load_lenient(&source(), &[TickerInfo::new("AAPL", "Apple")]);
        let json = serde_json::to_string(&ds).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.all_series(), ds.all_series());
        assert_eq!(back.events(), ds.events());
    }
}
