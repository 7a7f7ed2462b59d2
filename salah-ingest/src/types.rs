use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use salah_core::DailyPrayerTimes;
use serde::{Deserialize, Serialize};

/// One year of prayer times, keyed by Gregorian date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyTable {
    pub year: i32,
    pub fetched_at_utc: Option<DateTime<Utc>>,
    pub days: BTreeMap<NaiveDate, DailyPrayerTimes>,
}

impl YearlyTable {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            fetched_at_utc: None,
            days: BTreeMap::new(),
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyPrayerTimes> {
        self.days.get(&date)
    }

    /// Fadjr of the day after `date`, if that day is in this table.
    pub fn tomorrow_fadjr(&self, date: NaiveDate) -> Option<&str> {
        self.day(date + Duration::days(1)).map(|d| d.fadjr.as_str())
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
