//! In-memory cache of yearly tables, invalidated per year.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use salah_core::DailyPrayerTimes;

use crate::types::YearlyTable;

#[derive(Debug, Clone, Default)]
pub struct YearCache {
    years: BTreeMap<i32, YearlyTable>,
}

impl YearCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a table, replacing any earlier table for the same year.
    pub fn insert(&mut self, table: YearlyTable) -> Option<YearlyTable> {
        self.years.insert(table.year, table)
    }

    pub fn get(&self, year: i32) -> Option<&YearlyTable> {
        self.years.get(&year)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn invalidate(&mut self, year: i32) -> Option<YearlyTable> {
        self.years.remove(&year)
    }

    /// Drop every year not in `keep`.
    pub fn retain_years(&mut self, keep: &[i32]) {
        self.years.retain(|y, _| keep.contains(y));
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyPrayerTimes> {
        self.get(date.year()).and_then(|t| t.day(date))
    }

    /// Fadjr of the following day; crosses into the next year's table on 31 December.
    pub fn tomorrow_fadjr(&self, date: NaiveDate) -> Option<&str> {
        self.day(date + Duration::days(1)).map(|d| d.fadjr.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(year: i32, dates: &[(u32, u32, &str)]) -> YearlyTable {
        let mut t = YearlyTable::new(year);
        for (m, d, fadjr) in dates {
            let day = DailyPrayerTimes {
                fadjr: fadjr.to_string(),
                shuruk: "08:30".to_string(),
                duhr: "12:30".to_string(),
                assr: "14:15".to_string(),
                maghrib: "16:30".to_string(),
                ishaa: "18:10".to_string(),
                hijri: String::new(),
            };
            t.days.insert(NaiveDate::from_ymd_opt(year, *m, *d).unwrap(), day);
        }
        t
    }

    #[test]
    fn tomorrow_fadjr_crosses_year_boundary() {
        let mut cache = YearCache::new();
        cache.insert(table(2024, &[(12, 31, "06:40")]));
        let dec31 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

        assert_eq!(cache.tomorrow_fadjr(dec31), None);

        cache.insert(table(2025, &[(1, 1, "06:41")]));
        assert_eq!(cache.tomorrow_fadjr(dec31), Some("06:41"));
    }

    #[test]
    fn invalidate_and_retain() {
        let mut cache = YearCache::new();
        cache.insert(table(2023, &[(5, 1, "04:10")]));
        cache.insert(table(2024, &[(5, 1, "04:11")]));
        cache.insert(table(2025, &[(5, 1, "04:12")]));

        assert!(cache.invalidate(2023).is_some());
        assert!(!cache.contains(2023));

        cache.retain_years(&[2025]);
        assert_eq!(cache.years().collect::<Vec<_>>(), vec![2025]);
        let d = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert_eq!(cache.day(d).map(|x| x.fadjr.as_str()), Some("04:12"));
    }

    #[test]
    fn insert_replaces_same_year() {
        let mut cache = YearCache::new();
        assert!(cache.insert(table(2024, &[(1, 1, "06:00")])).is_none());
        let old = cache.insert(table(2024, &[(1, 1, "06:05")])).unwrap();
        assert_eq!(old.len(), 1);
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(cache.day(d).unwrap().fadjr, "06:05");
    }
}
