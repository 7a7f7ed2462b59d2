//! The day's board: what both `today` and `watch` show.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use salah_core::{
    EvaluationResult, HijriDate, PrayerName, countdown_to, display_offset, evaluate,
    format_countdown, format_hhmm, jamaa_time, parse_hhmm,
};

use crate::data::DayData;
use crate::settings_cmd::LocalSettings;

#[derive(Debug, Clone, PartialEq)]
pub struct PrayerRow {
    pub name: PrayerName,
    pub time: String,
    /// Jama'a offset as shown (`+10`, `-5`, or empty).
    pub offset: String,
    pub jamaa: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct Board {
    pub now: NaiveDateTime,
    pub gregorian: String,
    pub hijri: String,
    pub rows: Vec<PrayerRow>,
    pub shuruk: String,
    pub jumuah: String,
    pub result: EvaluationResult,
    pub countdown: String,
    pub fallback_fadjr: bool,
}

pub fn build_board(day: &DayData, now: NaiveDateTime, settings: &LocalSettings) -> Result<Board> {
    let mut options = settings.window_options(Some(&day.tomorrow_fadjr));
    if let Some(y) = &day.yesterday {
        options.yesterday_maghrib = Some(y.maghrib.clone());
        options.yesterday_ishaa = Some(y.ishaa.clone());
    }
    let result = evaluate(&day.today, now, &options)
        .with_context(|| format!("evaluate prayer times for {}", day.date))?;
    let current = result.current_prayer.map(|p| p.name);

    let mut rows = Vec::with_capacity(PrayerName::PRAYERS.len());
    for name in PrayerName::PRAYERS {
        let raw = day.today.time_of(name);
        let minutes = settings.prayer_offsets.get(name);
        let jamaa = if minutes == 0 {
            None
        } else {
            Some(format_hhmm(jamaa_time(parse_hhmm(raw)?, minutes)))
        };
        rows.push(PrayerRow {
            name,
            time: raw.to_string(),
            offset: display_offset(minutes),
            jamaa,
            active: current == Some(name),
        });
    }

    let hijri = match day.today.hijri.parse::<HijriDate>() {
        Ok(h) => h.to_string(),
        Err(_) if day.today.hijri.is_empty() => "-".to_string(),
        Err(_) => day.today.hijri.clone(),
    };

    Ok(Board {
        now,
        gregorian: day.date.format("%A, %-d %B %Y").to_string(),
        hijri,
        rows,
        shuruk: day.today.shuruk.clone(),
        jumuah: settings.jumuah_time.clone(),
        countdown: format_countdown(countdown_to(result.next_prayer.instant, now)),
        result,
        fallback_fadjr: day.fallback_fadjr,
    })
}

impl Board {
    pub fn next_line(&self) -> String {
        format!(
            "Next: {} at {} (in {})",
            self.result.next_prayer.name,
            format_hhmm(self.result.next_prayer.instant.time()),
            self.countdown
        )
    }

    pub fn current_label(&self) -> String {
        match (self.result.current_prayer, self.result.current_until) {
            (Some(p), Some(until)) => format!("{} (until {})", p.name, format_hhmm(until.time())),
            (Some(p), None) => p.name.to_string(),
            _ => "-".to_string(),
        }
    }

    pub fn render_text(&self, alias: &str) -> String {
        let mut s = String::new();
        s.push_str(&format!("Prayer times {alias}\n"));
        s.push_str(&format!("{} | {}\n", self.gregorian, self.hijri));
        s.push_str(&format!("Now {}\n\n", self.now.format("%H:%M:%S")));

        for r in &self.rows {
            let marker = if r.active { '*' } else { ' ' };
            let jamaa = r
                .jamaa
                .as_deref()
                .map(|t| format!(" ({t})"))
                .unwrap_or_default();
            s.push_str(&format!(
                "{marker} {:<8} {}  {:>4}{}\n",
                r.name.as_str(),
                r.time,
                r.offset,
                jamaa
            ));
        }

        s.push_str(&format!("\nShuruk {}   Jumuah {}\n", self.shuruk, self.jumuah));
        s.push_str(&format!("Current: {}\n", self.current_label()));
        s.push_str(&self.next_line());
        s.push('\n');
        if self.fallback_fadjr {
            s.push_str("(tomorrow's Fadjr unknown; assuming 05:30)\n");
        }
        s
    }
}

/// Current local wall-clock time in `tz`, or the `--at` override.
pub fn resolve_now(at: Option<&str>, tz: Tz) -> Result<NaiveDateTime> {
    match at {
        Some(s) => parse_at(s),
        None => Ok(Utc::now().with_timezone(&tz).naive_local()),
    }
}

fn parse_at(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    bail!("invalid --at '{s}': expected YYYY-MM-DDTHH:MM")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_day as day;

    #[test]
    fn marks_active_row_and_next_prayer() {
        let now = parse_at("2024-07-28T23:00").unwrap();
        let b = build_board(&day(), now, &LocalSettings::default()).unwrap();

        let active: Vec<_> = b.rows.iter().filter(|r| r.active).map(|r| r.name).collect();
        assert_eq!(active, vec![PrayerName::Ishaa]);
        // Next Fadjr is today's Fadjr moved one day forward.
        assert_eq!(b.next_line(), "Next: Fadjr at 05:30 (in 06:30:00)");
    }

    #[test]
    fn jamaa_times_follow_offsets() {
        let now = parse_at("2024-07-28T12:00").unwrap();
        let b = build_board(&day(), now, &LocalSettings::default()).unwrap();
        let duhr = b.rows.iter().find(|r| r.name == PrayerName::Duhr).unwrap();
        assert_eq!(duhr.offset, "+10");
        assert_eq!(duhr.jamaa.as_deref(), Some("13:40"));
        assert!(b.rows.iter().all(|r| !r.active));
    }

    #[test]
    fn text_render_has_hijri_and_marker() {
        let now = parse_at("2024-07-28T13:31").unwrap();
        let text = build_board(&day(), now, &LocalSettings::default())
            .unwrap()
            .render_text("Dortmund");
        assert!(text.contains("Prayer times Dortmund"));
        assert!(text.contains("22 Muharram 1446 AH"));
        assert!(text.contains("* Duhr"));
        assert!(text.contains("Current: Duhr (until 17:20)"));
    }

    #[test]
    fn previous_evening_bounds_ishaa_after_midnight() {
        let mut d = day();
        let mut yesterday = d.today.clone();
        yesterday.maghrib = "20:32".to_string();
        yesterday.ishaa = "22:03".to_string();
        d.yesterday = Some(yesterday);
        let settings = LocalSettings {
            deactivate_ishaa_at_midnight: true,
            ..Default::default()
        };

        // 20:32 to 05:30 puts Islamic midnight at 01:01; today's 20:30 would end it at 01:00.
        let b = build_board(&d, parse_at("2024-07-28T01:00").unwrap(), &settings).unwrap();
        assert_eq!(b.current_label(), "Ishaa (until 01:01)");
    }

    #[test]
    fn at_accepts_common_forms() {
        assert!(parse_at("2024-07-28T05:30").is_ok());
        assert!(parse_at("2024-07-28T05:30:15").is_ok());
        assert!(parse_at("2024-07-28 05:30").is_ok());
        assert!(parse_at("yesterday").is_err());
    }
}
