//! Pairwise relative-strength matrix and score ranking.
//!
//! For every ordered pair of group members the ratio of their level series is
//! compared against its own trailing average at the end of the slice. Cell
//! (row, col) = 1 when the row member's ratio sits above that average. Scores
//! are row sums; rankings compare the current snapshot against one taken a
//! few observations earlier.

use crate::domain::error::MarketpulseError;
use crate::domain::panel::Panel;
use crate::domain::window;
use std::collections::BTreeSet;

pub const MIN_MATRIX_MEMBERS: usize = 2;

/// Square 0/1 dominance table over the realized members. The diagonal is
/// never computed and stays 0.
#[derive(Debug, Clone)]
pub struct RsMatrix {
    members: Vec<String>,
    cells: Vec<Vec<u8>>,
}

impl RsMatrix {
    pub fn zeros(members: Vec<String>) -> Self {
        let n = members.len();
        Self {
            members,
            cells: vec![vec![0; n]; n],
        }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn row_score(&self, row: usize) -> u32 {
        self.cells[row].iter().map(|&c| c as u32).sum()
    }
}

/// One ranking table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub name: String,
    pub current: u32,
    pub past: u32,
    pub change: i32,
    pub rank: u32,
}

/// Current-snapshot matrix plus the ranked score table.
#[derive(Debug, Clone)]
pub struct StrengthRanking {
    pub matrix: RsMatrix,
    pub rows: Vec<ScoreRow>,
}

/// Dominance matrix for the given panel slice.
pub fn rs_matrix(
    panel: &Panel,
    requested: &[String],
    window: usize,
) -> Result<RsMatrix, MarketpulseError> {
    if window == 0 {
        return Err(MarketpulseError::InvalidWindow);
    }
    let selected = panel.select(requested);
    if selected.len() < MIN_MATRIX_MEMBERS {
        return Err(MarketpulseError::GroupTooSmall {
            size: selected.len(),
            minimum: MIN_MATRIX_MEMBERS,
        });
    }

    let n = selected.len();
    let mut cells = vec![vec![0u8; n]; n];
    for row in 0..n {
        for col in 0..n {
            if row == col {
                continue;
            }
            let ratio = window::ratio(selected[row].1, selected[col].1);
            let average = window::trailing_average(&ratio, window)?;
            let last_ratio = ratio.last().copied().flatten();
            let last_average = average.last().copied().flatten();
            // Insufficient history for the pair leaves the cell at 0.
            if let (Some(r), Some(a)) = (last_ratio, last_average) {
                if r > a {
                    cells[row][col] = 1;
                }
            }
        }
    }

    let members = selected
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect();
    Ok(RsMatrix { members, cells })
}

/// Dense descending rank: the highest score gets rank 1, tied scores share a
/// rank, and the next distinct score gets the next integer.
pub fn dense_rank_desc(scores: &[u32]) -> Vec<u32> {
    let distinct: BTreeSet<u32> = scores.iter().copied().collect();
    scores
        .iter()
        .map(|s| distinct.iter().filter(|d| *d > s).count() as u32 + 1)
        .collect()
}

/// Score the current snapshot against one taken `lookback` observations
/// earlier and rank the members.
///
/// The past snapshot is located by observation count, not calendar time, and
/// clamps to the first row on short panels. A past prefix no longer than the
/// window yields an all-zero past matrix instead of a partial computation.
pub fn rank_strength(
    panel: &Panel,
    requested: &[String],
    window: usize,
    lookback: usize,
) -> Result<StrengthRanking, MarketpulseError> {
    let current = rs_matrix(panel, requested, window)?;

    let snapshot = panel.len().saturating_sub(lookback + 1);
    let past_slice = panel.prefix(snapshot + 1);
    let past = if past_slice.len() > window {
        rs_matrix(&past_slice, requested, window)?
    } else {
        RsMatrix::zeros(current.members().to_vec())
    };

    let scores: Vec<u32> = (0..current.size()).map(|i| current.row_score(i)).collect();
    let ranks = dense_rank_desc(&scores);

    let mut rows: Vec<ScoreRow> = (0..current.size())
        .map(|i| ScoreRow {
            name: current.members()[i].clone(),
            current: scores[i],
            past: past.row_score(i),
            change: scores[i] as i32 - past.row_score(i) as i32,
            rank: ranks[i],
        })
        .collect();
    // Stable: tied members keep their group order.
    rows.sort_by_key(|r| r.rank);

    Ok(StrengthRanking {
        matrix: current,
        rows,
    })
}
