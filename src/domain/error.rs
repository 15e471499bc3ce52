//! Domain error types.

use crate::domain::group::GroupParseError;
use chrono::NaiveDate;

/// Top-level error type for marketpulse.
#[derive(Debug, thiserror::Error)]
pub enum MarketpulseError {
    #[error("failed to load data: {reason}")]
    DataLoad { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    GroupParse(#[from] GroupParseError),

    #[error("panel has no rows")]
    EmptyPanel,

    #[error("panel dates must be strictly ascending: {date} out of order")]
    PanelOrder { date: NaiveDate },

    #[error("instrument {name} appears more than once in the panel")]
    DuplicateInstrument { name: String },

    #[error("column {name} does not align with the date axis")]
    ColumnMisaligned { name: String },

    #[error("window length must be at least 1")]
    InvalidWindow,

    #[error("group has {size} members, need at least {minimum}")]
    GroupTooSmall { size: usize, minimum: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MarketpulseError> for std::process::ExitCode {
    fn from(err: &MarketpulseError) -> Self {
        let code: u8 = match err {
            MarketpulseError::Io(_) => 1,
            MarketpulseError::ConfigParse { .. } | MarketpulseError::ConfigInvalid { .. } => 2,
            MarketpulseError::DataLoad { .. } => 3,
            MarketpulseError::GroupParse(_)
            | MarketpulseError::InvalidWindow
            | MarketpulseError::GroupTooSmall { .. } => 4,
            MarketpulseError::EmptyPanel
            | MarketpulseError::PanelOrder { .. }
            | MarketpulseError::DuplicateInstrument { .. }
            | MarketpulseError::ColumnMisaligned { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
