//! The fixed indicator panel computed for every symbol.
//!
//! [`compute_features`] is a pure positional transform: index `i` of the output
//! corresponds to index `i` of the input bars. [`engineer`] applies the only
//! completeness filter (drop rows without a close) on top of it.

pub mod rolling;

use bar_source::RawBar;
use chrono::NaiveDate;

use rolling::{POPULATION, SAMPLE};

/// Trailing windows for the `Sma_N` columns.
pub const SMA_WINDOWS: [usize; 5] = [5, 10, 20, 50, 200];
/// Fast MACD leg.
pub const EMA_FAST: usize = 12;
/// Slow MACD leg.
pub const EMA_SLOW: usize = 26;
/// Span of the MACD signal line.
pub const MACD_SIGNAL_SPAN: usize = 9;
/// Bollinger window; also the volatility, momentum, and volume windows.
pub const BAND_WINDOW: usize = 20;
/// Bollinger band half-width in standard deviations.
pub const BAND_WIDTH: f64 = 2.0;

/// One bar plus its derived indicators.
///
/// Field order matches the columns of `processed_stage` / `processed_prices`.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct FeatureRow {
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
    /// Always defined; `0.0` where the ratio is not.
    pub returns: f64,
    /// Always defined; `0.0` where the log ratio is not.
    pub log_returns: f64,
    pub volatility_20: Option<f64>,
    pub momentum_20: Option<f64>,
    pub volume_sma_20: Option<f64>,
    pub volume_ratio: Option<f64>,
}

/// Compute the full indicator panel, one output row per input bar.
///
/// `bars` must be sorted ascending by date with no duplicate dates, which is what
/// [`bar_source::reader::read_raw_bars`] produces.
pub fn compute_features(bars: &[RawBar]) -> Vec<FeatureRow> {
    let close: Vec<Option<f64>> = bars.iter().map(|b| b.close).collect();
    let volume: Vec<Option<f64>> = bars.iter().map(|b| b.volume.map(|v| v as f64)).collect();

    let [sma_5, sma_10, sma_20, sma_50, sma_200] =
        SMA_WINDOWS.map(|n| rolling::rolling_mean(&close, n));

    let ema_12 = rolling::ema(&close, EMA_FAST);
    let ema_26 = rolling::ema(&close, EMA_SLOW);
    let macd = rolling::zip_with(&ema_12, &ema_26, |fast, slow| fast - slow);
    let macd_signal = rolling::ema(&macd, MACD_SIGNAL_SPAN);
    let macd_hist = rolling::zip_with(&macd, &macd_signal, |m, s| m - s);

    let band_std = rolling::rolling_std(&close, BAND_WINDOW, POPULATION);
    let bb_upper = rolling::zip_with(&sma_20, &band_std, |m, s| m + BAND_WIDTH * s);
    let bb_lower = rolling::zip_with(&sma_20, &band_std, |m, s| m - BAND_WIDTH * s);

    let returns = rolling::pct_change(&close);
    let log_returns = rolling::log_returns(&close);
    let log_series: Vec<Option<f64>> = log_returns.iter().copied().map(Some).collect();
    let volatility_20 = rolling::rolling_std(&log_series, BAND_WINDOW, SAMPLE);

    let momentum_20 = rolling::diff(&close, BAND_WINDOW);
    let volume_sma_20 = rolling::rolling_mean(&volume, BAND_WINDOW);
    let volume_ratio: Vec<Option<f64>> = volume
        .iter()
        .zip(&volume_sma_20)
        .map(|(v, avg)| match (*v, *avg) {
            (Some(v), Some(avg)) if avg != 0.0 => Some(v / avg),
            _ => None,
        })
        .collect();

    bars.iter()
        .enumerate()
        .map(|(i, bar)| FeatureRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            sma_5: sma_5[i],
            sma_10: sma_10[i],
            sma_20: sma_20[i],
            sma_50: sma_50[i],
            sma_200: sma_200[i],
            ema_12: ema_12[i],
            ema_26: ema_26[i],
            macd: macd[i],
            macd_signal: macd_signal[i],
            macd_hist: macd_hist[i],
            bb_middle: sma_20[i],
            bb_upper: bb_upper[i],
            bb_lower: bb_lower[i],
            returns: returns[i],
            log_returns: log_returns[i],
            volatility_20: volatility_20[i],
            momentum_20: momentum_20[i],
            volume_sma_20: volume_sma_20[i],
            volume_ratio: volume_ratio[i],
        })
        .collect()
}

/// [`compute_features`] followed by dropping rows whose close is null.
pub fn engineer(bars: &[RawBar]) -> Vec<FeatureRow> {
    let mut rows = compute_features(bars);
    rows.retain(|r| r.close.is_some());
    rows
}
