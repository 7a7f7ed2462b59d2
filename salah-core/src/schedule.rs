//! Schedule builder: anchor a day's `HH:MM` strings to a calendar date.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::prayer::{DailyPrayerTimes, PrayerName};
use crate::time::parse_hhmm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPrayer {
    pub name: PrayerName,
    pub instant: NaiveDateTime,
}

/// Resolve all six times against `anchor` and sort them ascending.
///
/// The sort is stable, so duplicate instants keep canonical name order.
pub fn build_schedule(
    times: &DailyPrayerTimes,
    anchor: NaiveDate,
) -> Result<Vec<ScheduledPrayer>, ParseError> {
    let mut schedule = PrayerName::ALL
        .into_iter()
        .map(|name| {
            let t = parse_hhmm(times.time_of(name))?;
            Ok(ScheduledPrayer {
                name,
                instant: anchor.and_time(t),
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    schedule.sort_by_key(|p| p.instant);
    Ok(schedule)
}

/// Look up a single entry by name.
pub fn instant_of(schedule: &[ScheduledPrayer], name: PrayerName) -> Option<NaiveDateTime> {
    schedule.iter().find(|p| p.name == name).map(|p| p.instant)
}
