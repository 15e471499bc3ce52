//! Wide date-indexed panel of instrument levels.

use crate::domain::error::MarketpulseError;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Immutable table keyed by (date, instrument).
///
/// Rows are strictly ascending, duplicate-free dates; a cell is `None` where
/// an instrument has no observation on that date. Partial column coverage is
/// expected and flows through dependent computations as missing values.
#[derive(Debug, Clone)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    names: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
    name_index: HashMap<String, usize>,
    date_index: HashMap<NaiveDate, usize>,
}

impl Panel {
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<Option<f64>>)>,
    ) -> Result<Self, MarketpulseError> {
        if dates.is_empty() {
            return Err(MarketpulseError::EmptyPanel);
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(MarketpulseError::PanelOrder { date: pair[1] });
            }
        }

        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        let mut name_index = HashMap::new();
        for (name, column) in columns {
            if column.len() != dates.len() {
                return Err(MarketpulseError::ColumnMisaligned { name });
            }
            if name_index.insert(name.clone(), names.len()).is_some() {
                return Err(MarketpulseError::DuplicateInstrument { name });
            }
            names.push(name);
            values.push(column);
        }

        let date_index = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        Ok(Self {
            dates,
            names,
            columns: values,
            name_index,
            date_index,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.name_index.get(name).map(|&i| self.columns[i].as_slice())
    }

    /// Columns for the requested names that are present, in request order.
    pub fn select<'a>(&'a self, names: &'a [String]) -> Vec<(&'a str, &'a [Option<f64>])> {
        names
            .iter()
            .filter_map(|n| self.column(n).map(|c| (n.as_str(), c)))
            .collect()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    /// Number of dates on which the instrument has an observation.
    pub fn observation_count(&self, name: &str) -> Option<usize> {
        self.column(name)
            .map(|c| c.iter().filter(|v| v.is_some()).count())
    }

    /// Copy of the first `rows` rows with all columns retained.
    pub fn prefix(&self, rows: usize) -> Panel {
        assert!(
            rows >= 1 && rows <= self.len(),
            "prefix length out of range"
        );
        let dates: Vec<NaiveDate> = self.dates[..rows].to_vec();
        let date_index = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        Panel {
            dates,
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c[..rows].to_vec()).collect(),
            name_index: self.name_index.clone(),
            date_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample_panel() -> Panel {
        Panel::new(
            vec![date(5), date(12), date(19)],
            vec![
                ("Nifty".into(), vec![Some(100.0), Some(101.0), Some(102.0)]),
                ("Bank".into(), vec![None, Some(50.0), Some(51.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_date_axis() {
        let result = Panel::new(vec![], vec![]);
        assert!(matches!(result, Err(MarketpulseError::EmptyPanel)));
    }

    #[test]
    fn rejects_unsorted_dates() {
        let result = Panel::new(vec![date(12), date(5)], vec![]);
        assert!(matches!(
            result,
            Err(MarketpulseError::PanelOrder { date: d }) if d == date(5)
        ));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let result = Panel::new(vec![date(5), date(5)], vec![]);
        assert!(matches!(result, Err(MarketpulseError::PanelOrder { .. })));
    }

    #[test]
    fn rejects_misaligned_column() {
        let result = Panel::new(
            vec![date(5), date(12)],
            vec![("Nifty".into(), vec![Some(100.0)])],
        );
        assert!(matches!(
            result,
            Err(MarketpulseError::ColumnMisaligned { name }) if name == "Nifty"
        ));
    }

    #[test]
    fn rejects_duplicate_instrument() {
        let result = Panel::new(
            vec![date(5)],
            vec![
                ("Nifty".into(), vec![Some(100.0)]),
                ("Nifty".into(), vec![Some(101.0)]),
            ],
        );
        assert!(matches!(
            result,
            Err(MarketpulseError::DuplicateInstrument { name }) if name == "Nifty"
        ));
    }

    #[test]
    fn column_lookup() {
        let panel = sample_panel();
        assert!(panel.has_column("Bank"));
        assert!(!panel.has_column("Metal"));
        assert_eq!(panel.column("Bank").unwrap()[0], None);
        assert_eq!(panel.column("Bank").unwrap()[1], Some(50.0));
        assert!(panel.column("Metal").is_none());
    }

    #[test]
    fn select_preserves_request_order_and_drops_absent() {
        let panel = sample_panel();
        let requested = vec!["Bank".to_string(), "Metal".to_string(), "Nifty".to_string()];
        let selected = panel.select(&requested);
        let names: Vec<&str> = selected.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Bank", "Nifty"]);
    }

    #[test]
    fn date_bounds_and_index() {
        let panel = sample_panel();
        assert_eq!(panel.first_date(), date(5));
        assert_eq!(panel.last_date(), date(19));
        assert_eq!(panel.index_of(date(12)), Some(1));
        assert_eq!(panel.index_of(date(13)), None);
    }

    #[test]
    fn observation_count_skips_missing_cells() {
        let panel = sample_panel();
        assert_eq!(panel.observation_count("Nifty"), Some(3));
        assert_eq!(panel.observation_count("Bank"), Some(2));
        assert_eq!(panel.observation_count("Metal"), None);
    }

    #[test]
    fn prefix_truncates_rows_keeps_columns() {
        let panel = sample_panel();
        let slice = panel.prefix(2);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice.last_date(), date(12));
        assert_eq!(slice.column_names(), panel.column_names());
        assert_eq!(slice.column("Bank").unwrap(), &[None, Some(50.0)]);
    }

    #[test]
    #[should_panic(expected = "prefix length out of range")]
    fn prefix_rejects_zero_rows() {
        sample_panel().prefix(0);
    }
}
