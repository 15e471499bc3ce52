//! Trailing window statistics over a single aligned series.
//!
//! A statistic at position i covers the positional window [i-w+1, i], shifted
//! back by `lag` for the channel extremes. The result is missing unless every
//! position of the window holds a value. Output length always equals input
//! length.

use crate::domain::error::MarketpulseError;

/// Mean of the `window` values ending at each position, current one included.
pub fn trailing_average(
    series: &[Option<f64>],
    window: usize,
) -> Result<Vec<Option<f64>>, MarketpulseError> {
    if window == 0 {
        return Err(MarketpulseError::InvalidWindow);
    }

    let values = (0..series.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let mut sum = 0.0;
            for v in &series[i + 1 - window..=i] {
                sum += (*v)?;
            }
            Some(sum / window as f64)
        })
        .collect();

    Ok(values)
}

/// Maximum over the `window` values ending `lag` positions before the current
/// one. Lag 1 is the prior-period extreme, deliberately excluding the current
/// observation so a breakout is measured against what came before it.
pub fn trailing_max(
    series: &[Option<f64>],
    window: usize,
    lag: usize,
) -> Result<Vec<Option<f64>>, MarketpulseError> {
    trailing_extreme(series, window, lag, f64::max)
}

/// Minimum counterpart of [`trailing_max`].
pub fn trailing_min(
    series: &[Option<f64>],
    window: usize,
    lag: usize,
) -> Result<Vec<Option<f64>>, MarketpulseError> {
    trailing_extreme(series, window, lag, f64::min)
}

fn trailing_extreme(
    series: &[Option<f64>],
    window: usize,
    lag: usize,
    pick: fn(f64, f64) -> f64,
) -> Result<Vec<Option<f64>>, MarketpulseError> {
    if window == 0 {
        return Err(MarketpulseError::InvalidWindow);
    }

    let values = (0..series.len())
        .map(|i| {
            if i + 1 < window + lag {
                return None;
            }
            let end = i - lag;
            let mut best: Option<f64> = None;
            for v in &series[end + 1 - window..=end] {
                let value = (*v)?;
                best = Some(match best {
                    Some(b) => pick(b, value),
                    None => value,
                });
            }
            best
        })
        .collect();

    Ok(values)
}

/// Elementwise division of two aligned series. Missing wherever either
/// operand is missing or the denominator is exactly zero; never an infinity.
pub fn ratio(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    assert_eq!(a.len(), b.len(), "ratio operands must share one date axis");
    a.iter()
        .zip(b)
        .map(|(num, den)| match (num, den) {
            (Some(n), Some(d)) if *d != 0.0 => Some(n / d),
            _ => None,
        })
        .collect()
}
