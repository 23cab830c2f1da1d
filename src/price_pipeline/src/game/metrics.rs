//! End-of-game performance figures.

use serde::Serialize;

/// Trading days per year used to annualize the Sharpe estimate.
pub const TRADING_DAYS: f64 = 252.0;

/// Performance summary of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Percent change of equity against the starting cash.
    pub return_pct: f64,
    /// Annualized mean / std of tick-to-tick equity returns.
    pub sharpe_est: f64,
    /// Largest peak-to-trough equity decline, in percent.
    pub max_drawdown: f64,
    /// Fills executed.
    pub trades_count: usize,
    /// Composite 0..=100 score.
    pub score: f64,
}

impl Summary {
    /// Compute every figure from current equity, the equity curve, and the trade count.
    pub fn from_curve(
        starting_cash: f64,
        current_equity: f64,
        equity: &[f64],
        trades_count: usize,
    ) -> Self {
        let return_pct = if starting_cash > 0.0 {
            (current_equity - starting_cash) / starting_cash * 100.0
        } else {
            0.0
        };
        let sharpe_est = sharpe(equity);
        let max_drawdown = max_drawdown_pct(equity);
        Self {
            return_pct,
            sharpe_est,
            max_drawdown,
            trades_count,
            score: score(return_pct, sharpe_est, max_drawdown, trades_count),
        }
    }
}

/// Annualized Sharpe estimate with a zero risk-free rate and population std.
///
/// Zero when there are fewer than two returns or the returns do not vary.
pub fn sharpe(equity: &[f64]) -> f64 {
    let returns: Vec<f64> = equity
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    if std == 0.0 {
        0.0
    } else {
        mean / std * TRADING_DAYS.sqrt()
    }
}

/// Maximum drawdown of the curve, in percent.
pub fn max_drawdown_pct(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut worst = 0.0f64;
    for &value in equity {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst * 100.0
}

/// Composite score: return mapped to 0..=100, plus a Sharpe bonus of up to 20,
/// minus a drawdown penalty of up to 20, plus an activity bonus of up to 10.
pub fn score(return_pct: f64, sharpe_est: f64, max_drawdown: f64, trades_count: usize) -> f64 {
    let return_score = (return_pct.clamp(-100.0, 100.0) + 100.0) / 2.0;
    let sharpe_score = (sharpe_est * 10.0).clamp(0.0, 20.0);
    let drawdown_penalty = (max_drawdown / 5.0).min(20.0);
    let activity_bonus = (trades_count as f64 / 10.0).min(10.0);
    (return_score + sharpe_score - drawdown_penalty + activity_bonus).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawdown_tracks_running_peak() {
        let dd = max_drawdown_pct(&[100.0, 120.0, 90.0, 130.0, 117.0]);
        assert!((dd - 25.0).abs() < 1e-12);
        assert_eq!(max_drawdown_pct(&[]), 0.0);
        assert_eq!(max_drawdown_pct(&[100.0, 101.0, 102.0]), 0.0);
    }

    #[test]
    fn sharpe_degenerate_cases() {
        assert_eq!(sharpe(&[100.0]), 0.0);
        assert_eq!(sharpe(&[100.0, 110.0]), 0.0);
        // constant growth rate has zero dispersion
        assert_eq!(sharpe(&[100.0, 100.0, 100.0, 100.0]), 0.0);
        assert!(sharpe(&[100.0, 101.0, 103.0, 104.0]) > 0.0);
    }

    #[test]
    fn score_matches_formula() {
        // flat game, no trades: 50 points
        assert_eq!(score(0.0, 0.0, 0.0, 0), 50.0);
        // 20% return, sharpe 1.5, 10% drawdown, 25 trades
        assert!((score(20.0, 1.5, 10.0, 25) - (60.0 + 15.0 - 2.0 + 2.5)).abs() < 1e-12);
        assert_eq!(score(500.0, 9.0, 0.0, 1_000), 100.0);
        assert_eq!(score(-100.0, -3.0, 100.0, 0), 0.0);
    }

    #[test]
    fn summary_from_flat_curve() {
        let s = Summary::from_curve(50_000.0, 50_000.0, &[50_000.0, 50_000.0], 0);
        assert_eq!(s.return_pct, 0.0);
        assert_eq!(s.score, 50.0);
    }
}
