//! Prayer-window evaluator: which prayer is active now, and which comes next.
//!
//! Each real prayer has an active window `[start, end)` that starts at its own
//! scheduled instant. The end depends on the prayer:
//!
//! | Prayer  | Window end                                                        |
//! |---------|-------------------------------------------------------------------|
//! | Fadjr   | Shuruk - offset                                                   |
//! | Duhr    | Assr - offset                                                     |
//! | Assr    | Maghrib - 60 min when deactivating early, else Maghrib - offset   |
//! | Maghrib | Ishaa - offset                                                    |
//! | Ishaa   | Islamic midnight when enabled, else tomorrow's Fadjr - offset     |
//!
//! Between windows there are dead zones where no prayer is current.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ParseError};
use crate::prayer::{DailyPrayerTimes, PrayerName};
use crate::schedule::{ScheduledPrayer, build_schedule, instant_of};
use crate::time::parse_hhmm;

/// Fadjr time assumed when tomorrow's record is unknown.
pub const FALLBACK_FADJR: &str = "05:30";

pub const DEFAULT_ACTIVE_OFFSET_MINUTES: i64 = 10;

/// Largest accepted `active_prayer_offset`.
pub const MAX_ACTIVE_OFFSET_MINUTES: i64 = 180;

/// Assr stops being active this long before Maghrib when `deactivate_assr_early` is set.
pub const ASSR_EARLY_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerWindowOptions {
    pub deactivate_assr_early: bool,
    pub deactivate_ishaa_at_midnight: bool,
    /// Tomorrow's Fadjr, `HH:MM`.
    pub tomorrow_fadjr: String,
    /// Minutes before the next boundary at which a window closes.
    pub active_prayer_offset: i64,
    /// Previous day's Maghrib and Ishaa, `HH:MM`. Used for an Ishaa still running after
    /// clock midnight; today's times are shifted back a day when absent.
    #[serde(default)]
    pub yesterday_maghrib: Option<String>,
    #[serde(default)]
    pub yesterday_ishaa: Option<String>,
}

impl Default for PrayerWindowOptions {
    fn default() -> Self {
        Self {
            deactivate_assr_early: false,
            deactivate_ishaa_at_midnight: false,
            tomorrow_fadjr: FALLBACK_FADJR.to_string(),
            active_prayer_offset: DEFAULT_ACTIVE_OFFSET_MINUTES,
            yesterday_maghrib: None,
            yesterday_ishaa: None,
        }
    }
}

impl PrayerWindowOptions {
    /// Boundary check for values coming from user settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.active_prayer_offset < 0 {
            return Err(ConfigError::NegativeOffset(self.active_prayer_offset));
        }
        if self.active_prayer_offset > MAX_ACTIVE_OFFSET_MINUTES {
            return Err(ConfigError::OffsetTooLarge(self.active_prayer_offset));
        }
        parse_hhmm(&self.tomorrow_fadjr)?;
        for t in [&self.yesterday_maghrib, &self.yesterday_ishaa].into_iter().flatten() {
            parse_hhmm(t)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub next_prayer: ScheduledPrayer,
    /// `None` inside a dead zone.
    pub current_prayer: Option<ScheduledPrayer>,
    /// End of the current prayer's window (exclusive).
    pub current_until: Option<NaiveDateTime>,
}

/// Islamic midnight: halfway between Maghrib and the following Fadjr.
pub fn islamic_midnight(maghrib: NaiveDateTime, next_fadjr: NaiveDateTime) -> NaiveDateTime {
    maghrib + (next_fadjr - maghrib) / 2
}

/// Evaluate the day's prayer windows at `now`.
///
/// The schedule is anchored to `now`'s calendar date; tomorrow's Fadjr is taken from
/// `options.tomorrow_fadjr` on the following date.
pub fn evaluate(
    times: &DailyPrayerTimes,
    now: NaiveDateTime,
    options: &PrayerWindowOptions,
) -> Result<EvaluationResult, ParseError> {
    let schedule = build_schedule(times, now.date())?;
    let tomorrow_fadjr = now.date().and_time(parse_hhmm(&options.tomorrow_fadjr)?) + Duration::days(1);

    let day = Day::new(&schedule, tomorrow_fadjr);

    let next_prayer = schedule
        .iter()
        .filter(|p| p.name.is_prayer())
        .find(|p| p.instant > now)
        .copied()
        .unwrap_or(ScheduledPrayer {
            name: PrayerName::Fadjr,
            instant: day.fadjr + Duration::days(1),
        });

    let mut current_prayer = None;
    let mut current_until = None;

    for p in schedule.iter().rev().filter(|p| p.name.is_prayer()) {
        if p.instant > now {
            continue;
        }
        let end = day.window_end(p.name, options);
        if now < end {
            current_prayer = Some(*p);
            current_until = Some(end);
            break;
        }
    }

    // After clock midnight, an Ishaa bounded by Islamic midnight may still be running
    // from the previous evening. Without the midnight rule the pre-Fadjr hours stay empty.
    if current_prayer.is_none() && now < day.fadjr && options.deactivate_ishaa_at_midnight {
        let yesterday = now.date() - Duration::days(1);
        let ishaa = match &options.yesterday_ishaa {
            Some(t) => yesterday.and_time(parse_hhmm(t)?),
            None => day.ishaa - Duration::days(1),
        };
        let maghrib = match &options.yesterday_maghrib {
            Some(t) => yesterday.and_time(parse_hhmm(t)?),
            None => day.maghrib - Duration::days(1),
        };
        let end = islamic_midnight(maghrib, day.fadjr);
        if ishaa <= now && now < end {
            current_prayer = Some(ScheduledPrayer {
                name: PrayerName::Ishaa,
                instant: ishaa,
            });
            current_until = Some(end);
        }
    }

    Ok(EvaluationResult {
        next_prayer,
        current_prayer,
        current_until,
    })
}

/// Named instants of one anchored day.
struct Day {
    fadjr: NaiveDateTime,
    shuruk: NaiveDateTime,
    assr: NaiveDateTime,
    maghrib: NaiveDateTime,
    ishaa: NaiveDateTime,
    tomorrow_fadjr: NaiveDateTime,
}

impl Day {
    fn new(schedule: &[ScheduledPrayer], tomorrow_fadjr: NaiveDateTime) -> Self {
        // build_schedule always yields all six names.
        let at = |name| instant_of(schedule, name).unwrap_or(tomorrow_fadjr);
        Self {
            fadjr: at(PrayerName::Fadjr),
            shuruk: at(PrayerName::Shuruk),
            assr: at(PrayerName::Assr),
            maghrib: at(PrayerName::Maghrib),
            ishaa: at(PrayerName::Ishaa),
            tomorrow_fadjr,
        }
    }

    fn window_end(&self, name: PrayerName, options: &PrayerWindowOptions) -> NaiveDateTime {
        // Out-of-range offsets are rejected by `validate`; clamp so unchecked input cannot overflow.
        let offset = Duration::minutes(
            options
                .active_prayer_offset
                .clamp(-MAX_ACTIVE_OFFSET_MINUTES, MAX_ACTIVE_OFFSET_MINUTES),
        );
        match name {
            PrayerName::Fadjr => self.shuruk - offset,
            PrayerName::Duhr => self.assr - offset,
            PrayerName::Assr if options.deactivate_assr_early => {
                self.maghrib - Duration::minutes(ASSR_EARLY_MINUTES)
            }
            PrayerName::Assr => self.maghrib - offset,
            PrayerName::Maghrib => self.ishaa - offset,
            PrayerName::Ishaa if options.deactivate_ishaa_at_midnight => {
                islamic_midnight(self.maghrib, self.tomorrow_fadjr)
            }
            PrayerName::Ishaa => self.tomorrow_fadjr - offset,
            // Never scanned; an empty window keeps it inactive.
            PrayerName::Shuruk => self.shuruk,
        }
    }
}
