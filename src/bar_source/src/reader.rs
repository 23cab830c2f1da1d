//! Normalization of raw bar CSV objects.
//!
//! Steps, in order:
//! 1. Trim and title-case every header (` close ` -> `Close`, `adj close` -> `Adj Close`).
//! 2. Select `Open, High, Low, Close, Volume, Date`; anything else is ignored, anything
//!    missing is a [`SourceError::MissingColumns`].
//! 3. Parse `Date` to a UTC calendar date; rows with an unparsable date are dropped.
//! 4. Coerce prices and volume to numbers; blank, unparsable, or non-finite cells become
//!    `None`. Negative volume is treated as missing.
//! 5. Sort ascending by date; when a date repeats, the last row in file order wins.

use std::io::Read;

use shared_utils::cast::{to_nullable_float, to_nullable_int};
use snafu::ResultExt;

use crate::{
    errors::{CsvSnafu, MissingColumnsSnafu, SourceError},
    models::bar::RawBar,
    tz::parse_date_utc,
};

/// Columns every raw object must carry after header normalization.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Open", "High", "Low", "Close", "Volume", "Date"];

const OPEN: usize = 0;
const HIGH: usize = 1;
const LOW: usize = 2;
const CLOSE: usize = 3;
const VOLUME: usize = 4;
const DATE: usize = 5;

/// Trim a header and title-case it: the first letter of each alphabetic run is
/// upper-cased, the rest lower-cased.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn parse_number(cell: &str) -> Option<f64> {
    to_nullable_float(cell.trim().parse::<f64>().ok())
}

/// Read one raw CSV object into a normalized, date-sorted bar series.
///
/// An object with the right header but no usable rows yields an empty vector; the
/// caller decides what "empty" means.
pub fn read_raw_bars<R: Read>(input: R) -> Result<Vec<RawBar>, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        // short rows pad with blanks instead of failing the whole object
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = rdr
        .headers()
        .context(CsvSnafu)?
        .iter()
        .map(normalize_header)
        .collect();

    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| h == name) {
            Some(i) => positions[slot] = i,
            None => missing.push((*name).to_string()),
        }
    }
    if !missing.is_empty() {
        return MissingColumnsSnafu { missing }.fail();
    }

    let mut bars = Vec::new();
    let mut undated = 0usize;
    for record in rdr.records() {
        let record = record.context(CsvSnafu)?;
        let cell = |slot: usize| record.get(positions[slot]).unwrap_or("");

        let Some(date) = parse_date_utc(cell(DATE)) else {
            undated += 1;
            continue;
        };

        bars.push(RawBar {
            date,
            open: parse_number(cell(OPEN)),
            high: parse_number(cell(HIGH)),
            low: parse_number(cell(LOW)),
            close: parse_number(cell(CLOSE)),
            volume: to_nullable_int(parse_number(cell(VOLUME))).filter(|v| *v >= 0),
        });
    }
    if undated > 0 {
        tracing::debug!(undated, "dropped rows without a parsable date");
    }

    // Stable sort keeps file order within a date, so "last wins" below is well defined.
    bars.sort_by_key(|b| b.date);
    Ok(dedup_keep_last(bars))
}

fn dedup_keep_last(bars: Vec<RawBar>) -> Vec<RawBar> {
    let mut out: Vec<RawBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}
