use anyhow::{Context, Result};
use salah_ingest::{YearCache, YearlyTable};
use std::fs;
use std::path::{Path, PathBuf};

/// `$SALAH_HOME`, or `~/.salah`.
pub fn salah_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("SALAH_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set (or set SALAH_HOME)")?;
    Ok(PathBuf::from(home).join(".salah"))
}

pub fn ensure_salah_home() -> Result<PathBuf> {
    let dir = salah_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// `cache/<alias>`: each location keeps its own yearly tables.
pub fn cache_dir(alias: &str) -> Result<PathBuf> {
    let dir = alias_cache_dir(&ensure_salah_home()?, alias);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn alias_cache_dir(home: &Path, alias: &str) -> PathBuf {
    let safe: String = alias
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let safe = if safe.is_empty() { "default".to_string() } else { safe };
    home.join("cache").join(safe)
}

pub fn cache_path(alias: &str, year: i32) -> Result<PathBuf> {
    Ok(cache_dir(alias)?.join(format!("{year}.json")))
}

/// Drop every cached year for `alias`.
pub fn clear_cache(alias: &str) -> Result<()> {
    let dir = alias_cache_dir(&ensure_salah_home()?, alias);
    if dir.exists() {
        fs::remove_dir_all(&dir).with_context(|| format!("remove {}", dir.display()))?;
        tracing::info!(%alias, path = %dir.display(), "cleared yearly cache");
    }
    Ok(())
}

pub fn logs_dir() -> Result<PathBuf> {
    Ok(ensure_salah_home()?.join("logs"))
}

pub fn read_cached_table(alias: &str, year: i32) -> Result<Option<YearlyTable>> {
    let p = cache_path(alias, year)?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let table: YearlyTable =
        serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(Some(table))
}

pub fn write_cached_table(alias: &str, table: &YearlyTable) -> Result<PathBuf> {
    let p = cache_path(alias, table.year)?;
    let json = serde_json::to_string(table)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    tracing::info!(%alias, year = table.year, days = table.len(), path = %p.display(), "cached yearly table");
    Ok(p)
}

/// Pull any of `years` that are on disk for `alias` but not yet in memory.
pub fn hydrate_cache(cache: &mut YearCache, alias: &str, years: &[i32]) -> Result<()> {
    for &year in years {
        if cache.contains(year) {
            continue;
        }
        if let Some(table) = read_cached_table(alias, year)? {
            tracing::debug!(%alias, year, "loaded yearly table from disk");
            cache.insert(table);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_is_a_single_path_segment() {
        let home = Path::new("/h");
        assert_eq!(alias_cache_dir(home, "Dortmund"), PathBuf::from("/h/cache/Dortmund"));
        assert_eq!(alias_cache_dir(home, "../etc"), PathBuf::from("/h/cache/___etc"));
        assert_eq!(alias_cache_dir(home, "Masjid An-Nur"), PathBuf::from("/h/cache/Masjid_An-Nur"));
        assert_eq!(alias_cache_dir(home, "  "), PathBuf::from("/h/cache/default"));
    }
}
