//! Distance from the trailing high, averaged across a group.

use crate::domain::error::MarketpulseError;
use crate::domain::panel::Panel;
use crate::domain::window;

/// Group-average drawdown per date. 0 = every member at or above its prior
/// trailing high, negative = below it. Values are capped at zero; a new high
/// never shows as a positive excursion.
#[derive(Debug, Clone)]
pub struct Drawdown {
    pub members: Vec<String>,
    pub values: Vec<Option<f64>>,
}

pub fn average_drawdown(
    panel: &Panel,
    requested: &[String],
    window: usize,
) -> Result<Drawdown, MarketpulseError> {
    if window == 0 {
        return Err(MarketpulseError::InvalidWindow);
    }

    let mut members = Vec::new();
    let mut sums = vec![0.0f64; panel.len()];
    let mut contributors = vec![0u32; panel.len()];

    for (name, series) in panel.select(requested) {
        members.push(name.to_string());
        // Prior-period rolling high: the current observation is excluded so a
        // fresh high still measures against the already-realized extreme.
        let highs = window::trailing_max(series, window, 1)?;
        for i in 0..panel.len() {
            if let (Some(value), Some(high)) = (series[i], highs[i]) {
                if high != 0.0 {
                    sums[i] += ((value - high) / high).min(0.0);
                    contributors[i] += 1;
                }
            }
        }
    }

    // Members without enough history are excluded from that date's average
    // rather than counted as zero.
    let values = sums
        .iter()
        .zip(&contributors)
        .map(|(sum, n)| {
            if *n > 0 {
                Some(sum / *n as f64)
            } else {
                None
            }
        })
        .collect();

    Ok(Drawdown { members, values })
}
