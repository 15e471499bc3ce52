//! Instrument group parsing and realization.
//!
//! Group membership is decided at invocation time by intersecting the
//! requested name list with the instruments actually present in the panel.
//! Absent names are dropped, not an error.

use crate::domain::panel::Panel;
use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
pub enum GroupParseError {
    #[error("empty token in instrument list")]
    EmptyToken,

    #[error("duplicate instrument: {0}")]
    DuplicateName(String),
}

/// Parse a comma-separated instrument list, preserving order and case.
pub fn parse_names(input: &str) -> Result<Vec<String>, GroupParseError> {
    let mut names = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(GroupParseError::EmptyToken);
        }
        if !seen.insert(trimmed.to_string()) {
            return Err(GroupParseError::DuplicateName(trimmed.to_string()));
        }
        names.push(trimmed.to_string());
    }

    Ok(names)
}

/// Requested names present in the panel, in request order.
pub fn realize(panel: &Panel, requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|n| panel.has_column(n))
        .cloned()
        .collect()
}
