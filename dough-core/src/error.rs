use thiserror::Error;

use crate::schedule::Stage;

/// Start time text that is not a 24-hour `HH:MM` clock reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("invalid start time {input:?}: expected HH:MM, e.g. 14:30")]
    InvalidTimeFormat { input: String },
}

/// Fermentation hours outside the yeast table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no yeast amount for {hours} h fermentation (valid: 12-20 h)")]
pub struct OutOfDomainKey {
    pub hours: u8,
}

/// Why no fermentation plan could be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    Time(#[from] TimeParseError),

    #[error("{stage} falls outside the supported date range")]
    OutOfRange { stage: Stage },
}

/// Host input outside the accepted range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
