//! Long-format CSV data adapter.
//!
//! Reads `Date,Index,Spot` records (dates as `%d-%b-%y`, levels optionally
//! carrying thousands separators) and pivots them into a wide [`Panel`].

use crate::domain::error::MarketpulseError;
use crate::domain::panel::Panel;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DataPort for CsvAdapter {
    fn load_panel(&self) -> Result<Panel, MarketpulseError> {
        let content = fs::read_to_string(&self.path).map_err(|e| MarketpulseError::DataLoad {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        parse_panel(&content)
    }
}

/// Pivot long-format records into the wide panel. Dates are sorted on load;
/// a duplicate (date, instrument) observation is a data error; an
/// unparseable level keeps the record but leaves the cell missing.
pub fn parse_panel(content: &str) -> Result<Panel, MarketpulseError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());

    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut cells: HashMap<String, BTreeMap<NaiveDate, Option<f64>>> = HashMap::new();
    let mut names: Vec<String> = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| MarketpulseError::DataLoad {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date_str = record.get(0).ok_or_else(|| MarketpulseError::DataLoad {
            reason: "missing Date column".into(),
        })?;
        let date = NaiveDate::parse_from_str(date_str.trim(), "%d-%b-%y").map_err(|e| {
            MarketpulseError::DataLoad {
                reason: format!("invalid date {:?}: {}", date_str, e),
            }
        })?;

        let name = record
            .get(1)
            .ok_or_else(|| MarketpulseError::DataLoad {
                reason: "missing Index column".into(),
            })?
            .trim();

        let spot = record.get(2).ok_or_else(|| MarketpulseError::DataLoad {
            reason: "missing Spot column".into(),
        })?;

        dates.insert(date);
        if !cells.contains_key(name) {
            names.push(name.to_string());
        }
        let column = cells.entry(name.to_string()).or_default();
        if column.insert(date, parse_level(spot)).is_some() {
            return Err(MarketpulseError::DataLoad {
                reason: format!("duplicate observation for {} on {}", name, date),
            });
        }
    }

    if dates.is_empty() {
        return Err(MarketpulseError::EmptyPanel);
    }

    let dates: Vec<NaiveDate> = dates.into_iter().collect();
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let observed = cells.remove(&name).unwrap_or_default();
        let values = dates
            .iter()
            .map(|d| observed.get(d).copied().flatten())
            .collect();
        columns.push((name, values));
    }

    Panel::new(dates, columns)
}

/// Strip thousands separators and coerce; anything unparseable is missing.
fn parse_level(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
