//! Assembled analytics output handed to the presentation layer.
//!
//! Plain numeric/tabular structures only; rendering concerns live in the
//! report adapters.

use crate::domain::strength::StrengthRanking;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Report {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub rows: usize,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone)]
pub enum Section {
    /// One or more series sharing a date axis.
    Series {
        title: String,
        dates: Vec<NaiveDate>,
        columns: Vec<SeriesColumn>,
    },
    /// Relative-strength matrix with its ranking table.
    Strength {
        title: String,
        ranking: StrengthRanking,
    },
    /// A section whose inputs were absent from the panel.
    Notice { title: String, message: String },
}

#[derive(Debug, Clone)]
pub struct SeriesColumn {
    pub label: String,
    pub values: Vec<Option<f64>>,
}
