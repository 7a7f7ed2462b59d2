use anyhow::{Context, Result, bail};
use clap::Subcommand;
use salah_core::{
    FALLBACK_FADJR, PrayerName, PrayerOffsets, PrayerWindowOptions, display_offset, parse_jumuah,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

use crate::config::load_config;
use crate::state::ensure_salah_home;

/// Per-location display and window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSettings {
    pub active_prayer_offset: i64,
    pub deactivate_assr_early: bool,
    pub deactivate_ishaa_at_midnight: bool,
    pub jumuah_time: String,
    pub prayer_offsets: PrayerOffsets,
    /// When set, the stored values are kept but the global defaults are used.
    #[serde(default)]
    pub locked: bool,
}

impl Default for LocalSettings {
    fn default() -> Self {
        let w = PrayerWindowOptions::default();
        Self {
            active_prayer_offset: w.active_prayer_offset,
            deactivate_assr_early: w.deactivate_assr_early,
            deactivate_ishaa_at_midnight: w.deactivate_ishaa_at_midnight,
            jumuah_time: salah_core::offsets::DEFAULT_JUMUAH.to_string(),
            prayer_offsets: PrayerOffsets::default(),
            locked: false,
        }
    }
}

impl LocalSettings {
    pub fn window_options(&self, tomorrow_fadjr: Option<&str>) -> PrayerWindowOptions {
        PrayerWindowOptions {
            deactivate_assr_early: self.deactivate_assr_early,
            deactivate_ishaa_at_midnight: self.deactivate_ishaa_at_midnight,
            tomorrow_fadjr: tomorrow_fadjr.unwrap_or(FALLBACK_FADJR).to_string(),
            active_prayer_offset: self.active_prayer_offset,
            yesterday_maghrib: None,
            yesterday_ishaa: None,
        }
    }

    /// The values display and evaluation should use.
    pub fn effective(&self) -> LocalSettings {
        if self.locked {
            LocalSettings {
                locked: true,
                ..LocalSettings::default()
            }
        } else {
            self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.window_options(None)
            .validate()
            .context("invalid window settings")?;
        parse_jumuah(&self.jumuah_time).context("invalid jumuah time")?;
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the settings for the configured (or given) alias
    Show {
        #[arg(long)]
        alias: Option<String>,
    },

    /// Update settings; unspecified values are left unchanged
    Set {
        #[arg(long)]
        alias: Option<String>,

        /// Minutes before the next boundary at which a prayer stops being active
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// End Assr's active window one hour before Maghrib
        #[arg(long, action = clap::ArgAction::Set)]
        assr_early: Option<bool>,

        /// End Ishaa's active window at the Islamic midnight
        #[arg(long, action = clap::ArgAction::Set)]
        ishaa_midnight: Option<bool>,

        /// Jumuah time, HH:MM
        #[arg(long)]
        jumuah: Option<String>,

        /// Jama'a offset, e.g. --jamaa Duhr=+15 (repeatable)
        #[arg(long, allow_hyphen_values = true)]
        jamaa: Vec<String>,

        /// Use the global defaults instead of this alias's values
        #[arg(long, action = clap::ArgAction::Set)]
        locked: Option<bool>,
    },
}

pub fn run(cmd: SettingsCommand) -> Result<()> {
    match cmd {
        SettingsCommand::Show { alias } => show(alias),
        SettingsCommand::Set {
            alias,
            offset,
            assr_early,
            ishaa_midnight,
            jumuah,
            jamaa,
            locked,
        } => set(
            alias,
            SettingsUpdate {
                offset,
                assr_early,
                ishaa_midnight,
                jumuah,
                jamaa,
                locked,
            },
        ),
    }
}

fn settings_path() -> Result<std::path::PathBuf> {
    Ok(ensure_salah_home()?.join("settings.json"))
}

fn read_store() -> Result<BTreeMap<String, LocalSettings>> {
    let p = settings_path()?;
    if !p.exists() {
        return Ok(BTreeMap::new());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?)
}

fn write_store(store: &BTreeMap<String, LocalSettings>) -> Result<()> {
    let p = settings_path()?;
    let json = serde_json::to_string_pretty(store)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Stored settings for `alias`, falling back to defaults when none are stored.
fn stored_settings(alias: &str) -> Result<LocalSettings> {
    let settings = read_store()?.remove(alias).unwrap_or_default();
    settings.validate()?;
    Ok(settings)
}

/// Settings in effect for `alias`: the global defaults while locked.
pub fn load_settings(alias: &str) -> Result<LocalSettings> {
    Ok(stored_settings(alias)?.effective())
}

fn resolve_alias(alias: Option<String>) -> Result<String> {
    match alias {
        Some(a) => Ok(a),
        None => Ok(load_config()?.location.alias),
    }
}

fn show(alias: Option<String>) -> Result<()> {
    let alias = resolve_alias(alias)?;
    let s = stored_settings(&alias)?;

    println!("Settings for {alias}:\n");
    if s.locked {
        println!("- locked: true (global defaults in use; unlock with --locked false)");
    }
    println!("- active_prayer_offset: {} min", s.active_prayer_offset);
    println!("- deactivate_assr_early: {}", s.deactivate_assr_early);
    println!("- deactivate_ishaa_at_midnight: {}", s.deactivate_ishaa_at_midnight);
    println!("- jumuah_time: {}", s.jumuah_time);
    println!("- jama'a offsets:");
    for name in PrayerName::PRAYERS {
        let off = display_offset(s.prayer_offsets.get(name));
        println!("    {:<8} {}", name, if off.is_empty() { "0" } else { off.as_str() });
    }
    Ok(())
}

#[derive(Debug, Default)]
struct SettingsUpdate {
    offset: Option<i64>,
    assr_early: Option<bool>,
    ishaa_midnight: Option<bool>,
    jumuah: Option<String>,
    jamaa: Vec<String>,
    locked: Option<bool>,
}

impl SettingsUpdate {
    fn edits_values(&self) -> bool {
        self.offset.is_some()
            || self.assr_early.is_some()
            || self.ishaa_midnight.is_some()
            || self.jumuah.is_some()
            || !self.jamaa.is_empty()
    }

    fn apply(&self, s: &mut LocalSettings, alias: &str) -> Result<()> {
        if let Some(l) = self.locked {
            s.locked = l;
        }
        if s.locked && self.edits_values() {
            bail!("settings for {alias} are locked; pass --locked false to edit them");
        }

        if let Some(o) = self.offset {
            s.active_prayer_offset = o;
        }
        if let Some(v) = self.assr_early {
            s.deactivate_assr_early = v;
        }
        if let Some(v) = self.ishaa_midnight {
            s.deactivate_ishaa_at_midnight = v;
        }
        if let Some(j) = &self.jumuah {
            s.jumuah_time = j.trim().to_string();
        }
        for a in &self.jamaa {
            s.prayer_offsets
                .apply_assignment(a)
                .with_context(|| format!("--jamaa {a}"))?;
        }
        s.validate()
    }
}

fn set(alias: Option<String>, update: SettingsUpdate) -> Result<()> {
    let alias = resolve_alias(alias)?;
    let mut store = read_store()?;
    let mut s = store.get(&alias).cloned().unwrap_or_default();

    update.apply(&mut s, &alias)?;
    store.insert(alias.clone(), s);
    write_store(&store)?;

    tracing::info!(alias = %alias, "updated settings");
    println!("Saved settings for {alias}");
    Ok(())
}
