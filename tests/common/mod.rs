#![allow(dead_code)]

use chrono::NaiveDate;
use marketpulse::domain::panel::Panel;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekly date axis starting at the given day.
pub fn weekly_dates(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map(|i| start + chrono::Duration::weeks(i as i64))
        .collect()
}

/// Panel over a weekly axis; every column must share one length.
pub fn weekly_panel(columns: &[(&str, Vec<Option<f64>>)]) -> Panel {
    let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    let dates = weekly_dates(date(2020, 1, 3), rows);
    let cols = columns
        .iter()
        .map(|(n, v)| (n.to_string(), v.clone()))
        .collect();
    Panel::new(dates, cols).unwrap()
}

pub fn dense(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Linear ramp, handy for unambiguous trends.
pub fn ramp(start: f64, step: f64, count: usize) -> Vec<Option<f64>> {
    (0..count).map(|i| Some(start + step * i as f64)).collect()
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Long-format CSV content for the panel builder, one record per
/// (date, instrument) cell.
pub fn long_csv(columns: &[(&str, Vec<Option<f64>>)]) -> String {
    let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    let dates = weekly_dates(date(2020, 1, 3), rows);
    let mut out = String::from("Date,Index,Spot\n");
    for (i, d) in dates.iter().enumerate() {
        for (name, values) in columns {
            if let Some(value) = values[i] {
                out.push_str(&format!("{},{},{}\n", d.format("%d-%b-%y"), name, value));
            }
        }
    }
    out
}
