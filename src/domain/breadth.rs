//! Market breadth: members trading above their own trailing average.

use crate::domain::error::MarketpulseError;
use crate::domain::panel::Panel;
use crate::domain::window;

/// Per-date count of realized group members whose raw value strictly exceeds
/// their own trailing average. Counts are never missing; a member without
/// enough history on a date contributes 0.
#[derive(Debug, Clone)]
pub struct Breadth {
    pub members: Vec<String>,
    pub counts: Vec<u32>,
}

impl Breadth {
    /// Realized group size, the upper bound of every count.
    pub fn group_size(&self) -> usize {
        self.members.len()
    }
}

pub fn breadth(
    panel: &Panel,
    requested: &[String],
    window: usize,
) -> Result<Breadth, MarketpulseError> {
    if window == 0 {
        return Err(MarketpulseError::InvalidWindow);
    }

    let mut members = Vec::new();
    let mut counts = vec![0u32; panel.len()];

    for (name, series) in panel.select(requested) {
        members.push(name.to_string());
        let average = window::trailing_average(series, window)?;
        for (count, (value, mean)) in counts.iter_mut().zip(series.iter().zip(&average)) {
            if let (Some(v), Some(m)) = (value, mean) {
                if v > m {
                    *count += 1;
                }
            }
        }
    }

    Ok(Breadth { members, counts })
}
