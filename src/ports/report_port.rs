//! Report output port trait.

use crate::domain::error::MarketpulseError;
use crate::domain::report::Report;
use std::path::Path;

/// Port for writing an assembled report.
pub trait ReportPort {
    /// Write `report` to the given path, or to stdout when no path is given.
    fn write(&self, report: &Report, output: Option<&Path>) -> Result<(), MarketpulseError>;
}
