//! Plain-text report adapter implementing ReportPort.
//!
//! Fixed-width tables, dates as `%Y-%m-%d`, missing values as `-`, matrix
//! cells as `Y`/`N`.

use crate::domain::error::MarketpulseError;
use crate::domain::report::{Report, Section, SeriesColumn};
use crate::domain::strength::StrengthRanking;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

const DATE_WIDTH: usize = 12;
const VALUE_WIDTH: usize = 14;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &Report) -> String {
        let mut out = String::new();
        out.push_str("marketpulse report\n");
        out.push_str(&format!(
            "data range: {} to {} ({} rows)\n",
            report.first_date, report.last_date, report.rows
        ));

        for section in &report.sections {
            out.push('\n');
            match section {
                Section::Series {
                    title,
                    dates,
                    columns,
                } => render_series(&mut out, title, dates, columns),
                Section::Strength { title, ranking } => {
                    render_strength(&mut out, title, ranking)
                }
                Section::Notice { title, message } => {
                    out.push_str(&format!("== {} ==\n  {}\n", title, message));
                }
            }
        }

        out
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, report: &Report, output: Option<&Path>) -> Result<(), MarketpulseError> {
        let text = self.render(report);
        match output {
            Some(path) => fs::write(path, text)?,
            None => print!("{}", text),
        }
        Ok(())
    }
}

fn render_series(out: &mut String, title: &str, dates: &[NaiveDate], columns: &[SeriesColumn]) {
    out.push_str(&format!("== {} ==\n", title));

    let widths: Vec<usize> = columns
        .iter()
        .map(|c| c.label.len().max(VALUE_WIDTH))
        .collect();

    out.push_str(&format!("{:<width$}", "date", width = DATE_WIDTH));
    for (column, width) in columns.iter().zip(&widths) {
        out.push_str(&format!("  {:>width$}", column.label, width = width));
    }
    out.push('\n');

    for (i, date) in dates.iter().enumerate() {
        out.push_str(&format!("{:<width$}", date.to_string(), width = DATE_WIDTH));
        for (column, width) in columns.iter().zip(&widths) {
            match column.values.get(i).copied().flatten() {
                Some(value) => {
                    out.push_str(&format!("  {:>width$.4}", value, width = width));
                }
                None => out.push_str(&format!("  {:>width$}", "-", width = width)),
            }
        }
        out.push('\n');
    }
}

fn render_strength(out: &mut String, title: &str, ranking: &StrengthRanking) {
    out.push_str(&format!("== {} ==\n", title));

    let matrix = &ranking.matrix;
    let width = matrix
        .members()
        .iter()
        .map(|m| m.len())
        .max()
        .unwrap_or(0)
        .max(4);

    out.push_str(&format!("{:<width$}", "", width = width));
    for member in matrix.members() {
        out.push_str(&format!("  {:>width$}", member, width = width));
    }
    out.push('\n');

    for row in 0..matrix.size() {
        out.push_str(&format!(
            "{:<width$}",
            matrix.members()[row],
            width = width
        ));
        for col in 0..matrix.size() {
            let mark = if row == col {
                "-"
            } else if matrix.cell(row, col) == 1 {
                "Y"
            } else {
                "N"
            };
            out.push_str(&format!("  {:>width$}", mark, width = width));
        }
        out.push('\n');
    }

    out.push_str("\nrankings:\n");
    out.push_str(&format!(
        "{:<width$}  {:>8}  {:>8}  {:>8}  {:>4}\n",
        "instrument",
        "current",
        "past",
        "change",
        "rank",
        width = width.max(10)
    ));
    for row in &ranking.rows {
        out.push_str(&format!(
            "{:<width$}  {:>8}  {:>8}  {:>8}  {:>4}\n",
            row.name,
            row.current,
            row.past,
            row.change,
            row.rank,
            width = width.max(10)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::panel::Panel;
    use crate::domain::strength;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample_report() -> Report {
        let panel = Panel::new(
            vec![date(5), date(12), date(19)],
            vec![
                ("A".into(), vec![Some(100.0), Some(110.0), Some(130.0)]),
                ("B".into(), vec![Some(100.0), Some(105.0), Some(112.0)]),
            ],
        )
        .unwrap();
        let group = vec!["A".to_string(), "B".to_string()];
        let ranking = strength::rank_strength(&panel, &group, 2, 1).unwrap();

        Report {
            first_date: date(5),
            last_date: date(19),
            rows: 3,
            sections: vec![
                Section::Series {
                    title: "Trend Analysis: A".into(),
                    dates: vec![date(5), date(12), date(19)],
                    columns: vec![
                        SeriesColumn {
                            label: "A".into(),
                            values: vec![Some(100.0), Some(110.0), Some(130.0)],
                        },
                        SeriesColumn {
                            label: "2w SMA".into(),
                            values: vec![None, Some(105.0), Some(120.0)],
                        },
                    ],
                },
                Section::Strength {
                    title: "Relative Strength".into(),
                    ranking,
                },
                Section::Notice {
                    title: "Nifty vs Gold".into(),
                    message: "required data (Nifty, GoldBees) not available".into(),
                },
            ],
        }
    }

    #[test]
    fn renders_header_and_sections() {
        let text = TextReportAdapter::new().render(&sample_report());

        assert!(text.starts_with("marketpulse report\n"));
        assert!(text.contains("data range: 2024-01-05 to 2024-01-19 (3 rows)"));
        assert!(text.contains("== Trend Analysis: A =="));
        assert!(text.contains("== Relative Strength =="));
        assert!(text.contains("== Nifty vs Gold =="));
        assert!(text.contains("required data (Nifty, GoldBees) not available"));
    }

    #[test]
    fn renders_missing_values_as_dash() {
        let text = TextReportAdapter::new().render(&sample_report());
        let warmup_row = text
            .lines()
            .find(|l| l.starts_with("2024-01-05"))
            .unwrap();

        assert!(warmup_row.contains("100.0000"));
        assert!(warmup_row.trim_end().ends_with('-'));
    }

    #[test]
    fn renders_matrix_marks_and_rankings() {
        let text = TextReportAdapter::new().render(&sample_report());

        // A dominates B over the rising slice; diagonal renders as '-'.
        assert!(text.contains("A        -     Y"));
        assert!(text.contains("rankings:"));
        assert!(text.contains("rank"));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        TextReportAdapter::new()
            .write(&sample_report(), Some(&path))
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("marketpulse report"));
    }
}
