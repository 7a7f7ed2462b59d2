use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{clear_cache, ensure_salah_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub location: LocationSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSection {
    /// Community / location name. Settings are stored per alias.
    pub alias: String,
    /// IANA timezone used to resolve "now".
    pub timezone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    /// Yearly endpoint; `?year=<YYYY>` is appended.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for LocationSection {
    fn default() -> Self {
        Self {
            alias: "default".to_string(),
            timezone: "Europe/Berlin".to_string(),
        }
    }
}

impl ServerSection {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        parse_tz(&self.location.timezone)
    }

    /// Copy with the API key masked, for printing.
    pub fn redacted(&self) -> Config {
        let mut c = self.clone();
        c.server.api_key = mask_secret(&c.server.api_key);
        c
    }
}

pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| anyhow!("invalid timezone: {name}"))
}

pub fn mask_secret(s: &str) -> String {
    let n = s.chars().count();
    if n == 0 {
        return String::new();
    }
    if n <= 4 {
        return "*".repeat(n);
    }
    let tail: String = s.chars().skip(n - 4).collect();
    format!("{}{}", "*".repeat(n - 4), tail)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_salah_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).context("parse config.toml")?;
    cfg.tz().context("config.toml [location].timezone")?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    tracing::info!(path = %p.display(), "saved config");
    Ok(())
}

/// Save `cfg` over the current config. Switching location or server drops the
/// new alias's cached tables so they are fetched again from the right source.
pub fn replace_config(cfg: &Config) -> Result<()> {
    let old = load_config()?;
    save_config(cfg)?;
    if source_changed(&old, cfg) {
        clear_cache(&cfg.location.alias)?;
    }
    Ok(())
}

fn source_changed(old: &Config, new: &Config) -> bool {
    old.location.alias.trim() != new.location.alias.trim()
        || old.server.url.trim() != new.server.url.trim()
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg.redacted()).context("serialize config")?);
    Ok(())
}
