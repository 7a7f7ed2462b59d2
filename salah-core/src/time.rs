//! Time-of-day parsing and countdown helpers.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::ParseError;

static HHMM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<h>\d{2}):(?P<m>\d{2})$").expect("static regex"));

static HHMMSS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<hm>\d{2}:\d{2}):\d{2}$").expect("static regex"));

/// Parse a zero-padded 24-hour `HH:MM` string.
///
/// Anything else is an error; a bad value is never coerced into a guessed time.
pub fn parse_hhmm(input: &str) -> Result<NaiveTime, ParseError> {
    let caps = HHMM_RE.captures(input).ok_or_else(|| ParseError::Malformed {
        input: input.to_string(),
    })?;

    let hour: u32 = caps["h"].parse().map_err(|_| ParseError::Malformed {
        input: input.to_string(),
    })?;
    let minute: u32 = caps["m"].parse().map_err(|_| ParseError::Malformed {
        input: input.to_string(),
    })?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| ParseError::OutOfRange {
        input: input.to_string(),
    })
}

/// Drop trailing seconds from an `HH:MM:SS` value. Other input is returned as-is
/// so that `parse_hhmm` can still reject it.
pub fn truncate_seconds(input: &str) -> &str {
    let trimmed = input.trim();
    match HHMMSS_RE.captures(trimmed) {
        Some(caps) => caps.name("hm").map(|m| m.as_str()).unwrap_or(trimmed),
        None => trimmed,
    }
}

/// Render a time of day back to `HH:MM`.
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Whole seconds from `now` until `target` (negative once it has passed).
pub fn countdown_to(target: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (target - now).num_seconds()
}

/// Format a countdown as `HH:MM:SS`; anything below zero shows `00:00:00`.
pub fn format_countdown(seconds: i64) -> String {
    if seconds < 0 {
        return "00:00:00".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
