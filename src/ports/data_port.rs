//! Data access port trait.

use crate::domain::error::MarketpulseError;
use crate::domain::panel::Panel;

/// Port for loading the canonical wide panel from a raw data source. The
/// implementor owns all parsing concerns: date parsing, numeric coercion and
/// pivoting long-format records.
pub trait DataPort {
    fn load_panel(&self) -> Result<Panel, MarketpulseError>;
}
