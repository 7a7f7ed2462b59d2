//! Yearly prayer-time table as served by the provider API.
//!
//! Expected body for `?year=2024`:
//!   {
//!     "2024": {
//!       "2024-07-28": { "Fadjr": "05:30:00", "Shuruk": "07:00:00", "Duhr": "13:30:00",
//!                       "Assr": "17:30:00", "Maghrib": "20:30:00", "Ishaa": "22:00:00",
//!                       "hijri": "1446/1/22" },
//!       ...
//!     }
//!   }
//!
//! Times may carry seconds; they are truncated to `HH:MM` here so the core only ever
//! sees minute-resolution values.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Datelike, NaiveDate};
use salah_core::{DailyPrayerTimes, PrayerName, parse_hhmm, truncate_seconds};
use serde::Deserialize;

use crate::types::YearlyTable;

#[derive(Debug, Deserialize)]
struct RawDay {
    #[serde(rename = "Fadjr")]
    fadjr: String,
    #[serde(rename = "Shuruk")]
    shuruk: String,
    #[serde(rename = "Duhr")]
    duhr: String,
    #[serde(rename = "Assr")]
    assr: String,
    #[serde(rename = "Maghrib")]
    maghrib: String,
    #[serde(rename = "Ishaa")]
    ishaa: String,
    #[serde(default)]
    hijri: Option<String>,
}

impl RawDay {
    fn into_daily(self) -> DailyPrayerTimes {
        DailyPrayerTimes {
            fadjr: truncate_seconds(&self.fadjr).to_string(),
            shuruk: truncate_seconds(&self.shuruk).to_string(),
            duhr: truncate_seconds(&self.duhr).to_string(),
            assr: truncate_seconds(&self.assr).to_string(),
            maghrib: truncate_seconds(&self.maghrib).to_string(),
            ishaa: truncate_seconds(&self.ishaa).to_string(),
            hijri: self.hijri.unwrap_or_default().trim().to_string(),
        }
    }
}

/// Parse a provider response into a validated table for `year`.
///
/// Every time string must be a valid `HH:MM` after truncation; the first bad entry
/// fails the whole table so a partial year never reaches the cache.
pub fn parse_yearly_json(text: &str, year: i32) -> Result<YearlyTable> {
    let raw: HashMap<String, BTreeMap<String, RawDay>> =
        serde_json::from_str(text).context("parse yearly prayer-time JSON")?;

    let year_key = year.to_string();
    let days = raw
        .into_iter()
        .find(|(k, _)| k.trim() == year_key)
        .map(|(_, v)| v)
        .ok_or_else(|| anyhow!("no prayer times for year {year} in response"))?;

    let mut table = YearlyTable::new(year);

    for (date_str, raw_day) in days {
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .with_context(|| format!("invalid date key '{date_str}'"))?;
        if date.year() != year {
            bail!("date {date} does not belong to year {year}");
        }

        let daily = raw_day.into_daily();
        for name in PrayerName::ALL {
            parse_hhmm(daily.time_of(name))
                .with_context(|| format!("{date}: invalid {name} time"))?;
        }

        table.days.insert(date, daily);
    }

    if table.is_empty() {
        bail!("response for year {year} contains no days");
    }

    Ok(table)
}
