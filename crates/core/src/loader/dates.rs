use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::CoreError;

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse a calendar date written in any of the formats found in exported
/// price and event tables. A time-of-day part, if present, is discarded.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let s = raw.trim();

    for fmt in &DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }

    for fmt in &DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(CoreError::InvalidDate(raw.to_string()))
}
