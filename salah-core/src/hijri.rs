//! Hijri calendar date as reported by the data source.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

const MONTHS: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Ula",
    "Jumada al-Akhira",
    "Rajab",
    "Shaban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qada",
    "Dhu al-Hijja",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HijriDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl HijriDate {
    pub fn month_name(&self) -> &'static str {
        MONTHS[(self.month as usize).saturating_sub(1).min(11)]
    }
}

impl FromStr for HijriDate {
    type Err = ParseError;

    /// Accepts `Y/M/D` and `Y-M-D`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::HijriDate {
            input: s.to_string(),
        };
        let sep = if s.contains('/') { '/' } else { '-' };
        let parts: Vec<&str> = s.trim().split(sep).collect();
        let [y, m, d] = parts.as_slice() else {
            return Err(err());
        };
        let year: u32 = y.parse().map_err(|_| err())?;
        let month: u32 = m.parse().map_err(|_| err())?;
        let day: u32 = d.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) || !(1..=30).contains(&day) {
            return Err(err());
        }
        Ok(Self { year, month, day })
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month_name(), self.year)
    }
}
