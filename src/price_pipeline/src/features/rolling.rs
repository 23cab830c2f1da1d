//! Positional window and smoothing primitives over nullable series.
//!
//! Every function is index-aligned: output `i` depends only on inputs `0..=i`, and
//! the output has the same length as the input. Windows are counted in samples, not
//! calendar days, and require every sample in the window to be present.

/// Divisor offset for a population standard deviation (divide by N).
pub const POPULATION: usize = 0;
/// Divisor offset for a sample standard deviation (divide by N - 1).
pub const SAMPLE: usize = 1;

fn rolling(values: &[Option<f64>], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut buf = Vec::with_capacity(window);
    for end in window..=values.len() {
        let slice = &values[end - window..end];
        if slice.iter().all(Option::is_some) {
            buf.clear();
            buf.extend(slice.iter().flatten());
            out[end - 1] = Some(f(&buf));
        }
    }
    out
}

/// Trailing simple moving average over `window` samples.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Trailing standard deviation over `window` samples with divisor `window - ddof`.
pub fn rolling_std(values: &[Option<f64>], window: usize, ddof: usize) -> Vec<Option<f64>> {
    if window <= ddof {
        return vec![None; values.len()];
    }
    rolling(values, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let ss: f64 = w.iter().map(|x| (x - mean) * (x - mean)).sum();
        (ss / (n - ddof as f64)).sqrt()
    })
}

/// Exponential moving average with smoothing factor `2 / (span + 1)`.
///
/// Seeded by the first observed value (no SMA seed, no warm-up nulls). A missing
/// input carries the previous average forward while its weight keeps decaying, so
/// the next observation is blended against a correspondingly smaller prior weight.
pub fn ema(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut out = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;
    let mut old_wt = 1.0;
    for v in values {
        match (state, *v) {
            (None, Some(x)) => {
                state = Some(x);
                old_wt = 1.0;
            }
            (None, None) => {}
            (Some(prev), Some(x)) => {
                old_wt *= decay;
                if prev != x {
                    state = Some((old_wt * prev + alpha * x) / (old_wt + alpha));
                }
                old_wt = 1.0;
            }
            (Some(_), None) => old_wt *= decay,
        }
        out.push(state);
    }
    out
}

/// `value[t] - value[t - lag]`, `None` until `lag` earlier samples exist.
pub fn diff(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i < lag {
                return None;
            }
            Some(values[i]? - values[i - lag]?)
        })
        .collect()
}

/// One-step simple return, `0.0` wherever it is undefined or non-finite.
pub fn pct_change(values: &[Option<f64>]) -> Vec<f64> {
    step_ratio(values, |prev, cur| (cur - prev) / prev)
}

/// One-step log return, `0.0` wherever it is undefined or non-finite.
pub fn log_returns(values: &[Option<f64>]) -> Vec<f64> {
    step_ratio(values, |prev, cur| (cur / prev).ln())
}

fn step_ratio(values: &[Option<f64>], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            if i == 0 {
                return 0.0;
            }
            match (values[i - 1], values[i]) {
                (Some(prev), Some(cur)) => {
                    let r = f(prev, cur);
                    if r.is_finite() { r } else { 0.0 }
                }
                _ => 0.0,
            }
        })
        .collect()
}

/// Element-wise combination of two aligned series; `None` if either side is.
pub fn zip_with(
    a: &[Option<f64>],
    b: &[Option<f64>],
    f: impl Fn(f64, f64) -> f64,
) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| Some(f((*x)?, (*y)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn some(xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().copied().map(Some).collect()
    }

    fn assert_approx(actual: Option<f64>, expected: f64) {
        let a = actual.expect("expected a value");
        assert!(
            (a - expected).abs() < EPS,
            "expected {expected}, got {a}"
        );
    }

    #[test]
    fn mean_needs_full_window() {
        let out = rolling_mean(&some(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]), 5);
        assert!(out[..4].iter().all(Option::is_none));
        assert_approx(out[4], 12.0);
        assert_approx(out[5], 13.0);
    }

    #[test]
    fn mean_null_poisons_window() {
        let mut xs = some(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        xs[2] = None;
        let out = rolling_mean(&xs, 3);
        assert_eq!(out[2], None);
        assert_eq!(out[3], None);
        assert_eq!(out[4], None);
        assert_approx(out[5], 14.0);
    }

    #[test]
    fn short_series_is_all_null() {
        assert!(rolling_mean(&some(&[1.0, 2.0]), 5).iter().all(Option::is_none));
        assert!(rolling_std(&some(&[1.0, 2.0]), 5, SAMPLE).iter().all(Option::is_none));
    }

    #[test]
    fn std_population_vs_sample() {
        let xs = some(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let pop = rolling_std(&xs, 8, POPULATION);
        assert_approx(pop[7], 2.0);
        let sample = rolling_std(&xs, 8, SAMPLE);
        assert_approx(sample[7], (32.0f64 / 7.0).sqrt());
    }

    #[test]
    fn ema_seeds_from_first_value() {
        let out = ema(&some(&[10.0, 20.0, 30.0]), 3);
        // alpha = 0.5
        assert_approx(out[0], 10.0);
        assert_approx(out[1], 15.0);
        assert_approx(out[2], 22.5);
    }

    #[test]
    fn ema_carries_over_gaps() {
        let out = ema(&[None, Some(10.0), None, Some(20.0)], 3);
        assert_eq!(out[0], None);
        assert_approx(out[1], 10.0);
        assert_approx(out[2], 10.0);
        // prior weight decayed twice: 0.25 vs 0.5 on the new value
        assert_approx(out[3], (0.25 * 10.0 + 0.5 * 20.0) / 0.75);
    }

    #[test]
    fn diff_counts_positions() {
        let out = diff(&some(&[1.0, 2.0, 4.0, 8.0]), 2);
        assert_eq!(out, vec![None, None, Some(3.0), Some(6.0)]);
    }

    #[test]
    fn returns_default_to_zero() {
        let xs = vec![Some(10.0), Some(11.0), None, Some(12.0), Some(0.0), Some(5.0)];
        let r = pct_change(&xs);
        assert_eq!(r[0], 0.0);
        assert!((r[1] - 0.1).abs() < EPS);
        assert_eq!(r[2], 0.0);
        assert_eq!(r[3], 0.0);
        assert!((r[4] + 1.0).abs() < EPS);
        // division by a zero close
        assert_eq!(r[5], 0.0);

        let l = log_returns(&xs);
        assert_eq!(l[0], 0.0);
        assert!((l[1] - (1.1f64).ln()).abs() < EPS);
        // ln(0) is -inf
        assert_eq!(l[4], 0.0);
    }
}
