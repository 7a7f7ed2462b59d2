//! Resolve today's record and tomorrow's Fadjr from the cache, fetching when allowed.

use anyhow::{Result, bail};
use chrono::{Datelike, Duration, NaiveDate};
use salah_core::{DailyPrayerTimes, FALLBACK_FADJR};
use salah_ingest::YearCache;

use crate::config::Config;
use crate::fetch::fetch_year;
use crate::state::{hydrate_cache, write_cached_table};

#[derive(Debug, Clone)]
pub struct DayData {
    pub date: NaiveDate,
    pub today: DailyPrayerTimes,
    pub tomorrow_fadjr: String,
    /// Previous day's record, when cached. Bounds an Ishaa that runs past clock midnight.
    pub yesterday: Option<DailyPrayerTimes>,
    /// True when tomorrow's Fadjr is the fixed fallback rather than real data.
    pub fallback_fadjr: bool,
}

pub async fn load_day(
    cfg: &Config,
    cache: &mut YearCache,
    date: NaiveDate,
    allow_fetch: bool,
) -> Result<DayData> {
    let tomorrow = date + Duration::days(1);
    let yesterday = date - Duration::days(1);
    let years = [yesterday.year(), date.year(), tomorrow.year()];
    hydrate_cache(cache, &cfg.location.alias, &years)?;

    if cache.day(date).is_none() && allow_fetch {
        refresh_year(cfg, cache, date.year()).await?;
    }

    let Some(today) = cache.day(date).cloned() else {
        bail!("no prayer times for {date} in cache; run: salah sync --year {}", date.year());
    };

    if cache.day(tomorrow).is_none() && allow_fetch && !cache.contains(tomorrow.year()) {
        if let Err(e) = refresh_year(cfg, cache, tomorrow.year()).await {
            tracing::warn!(year = tomorrow.year(), "could not fetch next year: {e:#}");
        }
    }

    let (tomorrow_fadjr, fallback_fadjr) = match cache.tomorrow_fadjr(date) {
        Some(f) => (f.to_string(), false),
        None => {
            tracing::warn!(%date, "tomorrow's Fadjr unknown; using {FALLBACK_FADJR}");
            (FALLBACK_FADJR.to_string(), true)
        }
    };

    Ok(DayData {
        date,
        today,
        tomorrow_fadjr,
        yesterday: cache.day(yesterday).cloned(),
        fallback_fadjr,
    })
}

/// Re-download a year, replacing both the in-memory and on-disk copies.
pub async fn refresh_year(cfg: &Config, cache: &mut YearCache, year: i32) -> Result<()> {
    let table = fetch_year(&cfg.server, year).await?;
    write_cached_table(&cfg.location.alias, &table)?;
    cache.invalidate(year);
    cache.insert(table);
    Ok(())
}

/// A summer day in Dortmund, with tomorrow's Fadjr known.
#[cfg(test)]
pub(crate) fn sample_day() -> DayData {
    DayData {
        date: NaiveDate::from_ymd_opt(2024, 7, 28).unwrap(),
        today: DailyPrayerTimes {
            fadjr: "05:30".to_string(),
            shuruk: "07:00".to_string(),
            duhr: "13:30".to_string(),
            assr: "17:30".to_string(),
            maghrib: "20:30".to_string(),
            ishaa: "22:00".to_string(),
            hijri: "1446/1/22".to_string(),
        },
        tomorrow_fadjr: "05:31".to_string(),
        yesterday: None,
        fallback_fadjr: false,
    }
}
