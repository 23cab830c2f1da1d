//! Timestamp parsing for the `Date` column of raw files.
//!
//! Vendors disagree on what a "date" cell looks like:
//! - plain dates: `2024-03-08`
//! - RFC-3339: `2024-03-08T00:00:00Z`, `2024-03-08T00:00:00+11:00`
//! - pandas-style with offset: `2024-03-08 00:00:00+11:00`
//! - naive date-times: `2024-03-08 16:00:00` (taken as UTC)
//!
//! Offset-bearing values are converted to UTC first and then truncated to the
//! calendar date, so an exchange-local midnight east of Greenwich lands on the
//! previous UTC day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a raw `Date` cell into a UTC calendar date. Returns `None` when nothing matches.
pub fn parse_date_utc(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.date());
        }
    }
    None
}
