//! salah-core: prayer schedule and active-window evaluation.
//!
//! Everything here is pure: inputs are supplied fresh on every call and nothing is
//! cached, so callers can re-evaluate on every clock tick.

pub mod error;
pub mod hijri;
pub mod offsets;
pub mod prayer;
pub mod schedule;
pub mod time;
pub mod window;

pub use error::{ConfigError, ParseError};
pub use hijri::HijriDate;
pub use offsets::{PrayerOffsets, display_offset, jamaa_time, parse_jumuah, parse_offset};
pub use prayer::{DailyPrayerTimes, PrayerName};
pub use schedule::{ScheduledPrayer, build_schedule};
pub use time::{countdown_to, format_countdown, format_hhmm, parse_hhmm, truncate_seconds};
pub use window::{
    EvaluationResult, FALLBACK_FADJR, MAX_ACTIVE_OFFSET_MINUTES, PrayerWindowOptions, evaluate, islamic_midnight,
};
