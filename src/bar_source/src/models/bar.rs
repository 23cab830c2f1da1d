//! Canonical in-memory representation of one daily OHLCV record.

use chrono::NaiveDate;

/// One calendar day's trading record for one symbol.
///
/// Prices and volume are nullable: the raw files come from several vendors and a
/// blank or non-numeric cell is coerced to `None` rather than rejecting the row.
/// Within a series there is exactly one bar per `date`, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    /// Trading date (UTC calendar date, no time of day).
    pub date: NaiveDate,
    /// Opening price.
    pub open: Option<f64>,
    /// Highest price of the day.
    pub high: Option<f64>,
    /// Lowest price of the day.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Shares traded. Non-negative when present.
    pub volume: Option<i64>,
}

impl RawBar {
    /// A bar where only the close and volume are known; open/high/low mirror the close.
    pub fn from_close(date: NaiveDate, close: f64, volume: i64) -> Self {
        Self {
            date,
            open: Some(close),
            high: Some(close),
            low: Some(close),
            close: Some(close),
            volume: Some(volume),
        }
    }
}
