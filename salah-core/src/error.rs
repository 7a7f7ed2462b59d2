//! Error types surfaced by the core.

use thiserror::Error;

/// A time-of-day string that is not a valid zero-padded `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed time '{input}': expected HH:MM")]
    Malformed { input: String },

    #[error("time out of range '{input}': hour must be 00-23 and minute 00-59")]
    OutOfRange { input: String },

    #[error("malformed hijri date '{input}': expected Y/M/D")]
    HijriDate { input: String },
}

/// Rejected configuration values. Raised at the settings boundary, never inside evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("active prayer offset must not be negative (got {0} minutes)")]
    NegativeOffset(i64),

    #[error("active prayer offset must be at most {max} minutes (got {0})", max = crate::window::MAX_ACTIVE_OFFSET_MINUTES)]
    OffsetTooLarge(i64),

    #[error("invalid offset '{0}': expected signed minutes like +10 or -5")]
    InvalidOffset(String),

    #[error("unknown prayer name '{0}'")]
    UnknownPrayer(String),

    #[error(transparent)]
    Time(#[from] ParseError),
}
