//! Jama'a (congregational prayer) offsets and the Jumuah time.
//!
//! Offsets are display-only: they shift the time shown next to a prayer and never
//! feed into window evaluation.

use std::sync::LazyLock;

use chrono::{Duration, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::prayer::PrayerName;
use crate::time::parse_hhmm;

/// Largest accepted shift in either direction.
pub const MAX_OFFSET_MINUTES: i32 = 180;

pub const DEFAULT_JUMUAH: &str = "14:00";

static OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<sign>[+-]?)(?P<n>\d{1,3})$").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrayerOffsets {
    pub fadjr: i32,
    pub duhr: i32,
    pub assr: i32,
    pub maghrib: i32,
    pub ishaa: i32,
}

impl Default for PrayerOffsets {
    fn default() -> Self {
        Self {
            fadjr: 30,
            duhr: 10,
            assr: 10,
            maghrib: 5,
            ishaa: 10,
        }
    }
}

impl PrayerOffsets {
    /// Shuruk has no congregation and always reports zero.
    pub fn get(&self, name: PrayerName) -> i32 {
        match name {
            PrayerName::Fadjr => self.fadjr,
            PrayerName::Shuruk => 0,
            PrayerName::Duhr => self.duhr,
            PrayerName::Assr => self.assr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Ishaa => self.ishaa,
        }
    }

    pub fn set(&mut self, name: PrayerName, minutes: i32) -> Result<(), ConfigError> {
        let slot = match name {
            PrayerName::Fadjr => &mut self.fadjr,
            PrayerName::Duhr => &mut self.duhr,
            PrayerName::Assr => &mut self.assr,
            PrayerName::Maghrib => &mut self.maghrib,
            PrayerName::Ishaa => &mut self.ishaa,
            PrayerName::Shuruk => return Err(ConfigError::UnknownPrayer(name.to_string())),
        };
        *slot = check_range(minutes, &minutes.to_string())?;
        Ok(())
    }

    /// Apply a `Name=+N` assignment as typed on the command line.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOffset(assignment.to_string()))?;
        let name: PrayerName = name.parse()?;
        self.set(name, parse_offset(value)?)
    }
}

/// Parse a free-text offset such as `+10`, `-5`, `7` or an empty string (zero).
pub fn parse_offset(input: &str) -> Result<i32, ConfigError> {
    let s = input.trim();
    if s.is_empty() {
        return Ok(0);
    }
    let caps = OFFSET_RE
        .captures(s)
        .ok_or_else(|| ConfigError::InvalidOffset(input.to_string()))?;
    let n: i32 = caps["n"]
        .parse()
        .map_err(|_| ConfigError::InvalidOffset(input.to_string()))?;
    let value = if &caps["sign"] == "-" { -n } else { n };
    check_range(value, input)
}

fn check_range(value: i32, input: &str) -> Result<i32, ConfigError> {
    if value.abs() > MAX_OFFSET_MINUTES {
        return Err(ConfigError::InvalidOffset(input.to_string()));
    }
    Ok(value)
}

/// `+10`, `-5`, or empty for zero.
pub fn display_offset(minutes: i32) -> String {
    match minutes {
        0 => String::new(),
        m if m > 0 => format!("+{m}"),
        m => m.to_string(),
    }
}

/// Prayer time shifted by its Jama'a offset, wrapping around midnight.
pub fn jamaa_time(time: NaiveTime, offset_minutes: i32) -> NaiveTime {
    let (shifted, _) = time.overflowing_add_signed(Duration::minutes(offset_minutes.into()));
    shifted
}

/// Validate a Jumuah time before it is stored.
pub fn parse_jumuah(input: &str) -> Result<NaiveTime, ConfigError> {
    Ok(parse_hhmm(input.trim())?)
}
