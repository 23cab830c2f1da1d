//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`]:
//! - [`crate::schema::processed_stage`]: transient rows written by the stage loader
//! - [`crate::schema::processed_prices`]: the permanent series keyed by `(symbol, date)`

use chrono::NaiveDate;
use diesel::prelude::*;
use shared_utils::cast::to_nullable_float;

use crate::features::FeatureRow;
use crate::schema::*;

/// Insertable staging row: one [`FeatureRow`] tagged with its symbol.
///
/// Every float field has passed through [`to_nullable_float`], so NaN and
/// infinities are stored as SQL NULL. Volume is already a checked integer.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = processed_stage, treat_none_as_default_value = false)]
#[allow(missing_docs)]
pub struct StageRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
    pub sma_5: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub returns: Option<f64>,
    pub log_returns: Option<f64>,
    pub volatility_20: Option<f64>,
    pub momentum_20: Option<f64>,
    pub volume_sma_20: Option<f64>,
    pub volume_ratio: Option<f64>,
}

impl StageRecord {
    /// Map a computed row field-by-field, applying the sink casts.
    pub fn from_feature(symbol: &str, row: &FeatureRow) -> Self {
        let f = to_nullable_float;
        Self {
            symbol: symbol.to_owned(),
            date: row.date,
            open: f(row.open),
            high: f(row.high),
            low: f(row.low),
            close: f(row.close),
            volume: row.volume,
            sma_5: f(row.sma_5),
            sma_10: f(row.sma_10),
            sma_20: f(row.sma_20),
            sma_50: f(row.sma_50),
            sma_200: f(row.sma_200),
            ema_12: f(row.ema_12),
            ema_26: f(row.ema_26),
            macd: f(row.macd),
            macd_signal: f(row.macd_signal),
            macd_hist: f(row.macd_hist),
            bb_middle: f(row.bb_middle),
            bb_upper: f(row.bb_upper),
            bb_lower: f(row.bb_lower),
            returns: f(Some(row.returns)),
            log_returns: f(Some(row.log_returns)),
            volatility_20: f(row.volatility_20),
            momentum_20: f(row.momentum_20),
            volume_sma_20: f(row.volume_sma_20),
            volume_ratio: f(row.volume_ratio),
        }
    }
}

/// A row in [`crate::schema::processed_prices`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = processed_prices, check_for_backend(diesel::sqlite::Sqlite))]
#[allow(missing_docs)]
pub struct PriceRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
    pub sma_5: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub returns: Option<f64>,
    pub log_returns: Option<f64>,
    pub volatility_20: Option<f64>,
    pub momentum_20: Option<f64>,
    pub volume_sma_20: Option<f64>,
    pub volume_ratio: Option<f64>,
    /// UTC timestamp of the insert or last merge update (ISO 8601, millisecond precision).
    pub load_ts: String,
}

impl PriceRecord {
    /// Whether every stored feature column equals the staged one (ignores `load_ts`).
    pub fn matches(&self, staged: &StageRecord) -> bool {
        self.symbol == staged.symbol
            && self.date == staged.date
            && self.open == staged.open
            && self.high == staged.high
            && self.low == staged.low
            && self.close == staged.close
            && self.volume == staged.volume
            && self.sma_5 == staged.sma_5
            && self.sma_10 == staged.sma_10
            && self.sma_20 == staged.sma_20
            && self.sma_50 == staged.sma_50
            && self.sma_200 == staged.sma_200
            && self.ema_12 == staged.ema_12
            && self.ema_26 == staged.ema_26
            && self.macd == staged.macd
            && self.macd_signal == staged.macd_signal
            && self.macd_hist == staged.macd_hist
            && self.bb_middle == staged.bb_middle
            && self.bb_upper == staged.bb_upper
            && self.bb_lower == staged.bb_lower
            && self.returns == staged.returns
            && self.log_returns == staged.log_returns
            && self.volatility_20 == staged.volatility_20
            && self.momentum_20 == staged.momentum_20
            && self.volume_sma_20 == staged.volume_sma_20
            && self.volume_ratio == staged.volume_ratio
    }
}
