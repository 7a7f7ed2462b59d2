use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use salah_ingest::{YearCache, decrypt_config_payload};

mod board;
mod config;
mod data;
mod fetch;
mod logging;
mod settings_cmd;
mod setup;
mod state;
mod watch;

use board::{build_board, resolve_now};
use config::{load_config, replace_config};
use settings_cmd::{SettingsCommand, load_settings};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SALAH_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "salah", version, long_version = LONG_VERSION, about = "Prayer times, countdown and active prayer window")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive setup: location, timezone, server
    Setup,

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Import an encrypted configuration payload (the text of a community QR code)
    Import {
        /// Base64 payload
        #[arg(long)]
        payload: String,

        /// 32-character transport key
        #[arg(long, env = "SALAH_TRANSPORT_KEY", hide_env_values = true)]
        key: String,
    },

    /// Download yearly prayer times into the local cache
    Sync {
        /// Year to fetch (default: this year, plus next year in December)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Print today's prayer board
    Today {
        /// Evaluate at this local time instead of now (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: Option<String>,

        /// Show this date (YYYY-MM-DD) at the current time of day
        #[arg(long, conflicts_with = "at")]
        date: Option<NaiveDate>,
    },

    /// Print the next prayer and the current one on a single line
    Next {
        #[arg(long)]
        at: Option<String>,
    },

    /// Per-location window and jama'a settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Live full-screen board (q quits, r re-syncs)
    Watch,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.salah/config.toml if none exists
    Init,
    /// Print the resolved config (API key masked)
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init()?;
    tracing::debug!(command = ?cli.command, "start");

    match cli.command {
        Command::Setup => {
            setup::run_setup()?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },

        Command::Import { payload, key } => {
            let server = decrypt_config_payload(&payload, key.as_bytes())
                .context("import configuration payload")?;

            let mut cfg = load_config()?;
            cfg.location.alias = server.alias.clone();
            cfg.server.url = server.server_url;
            cfg.server.api_key = server.api_key;
            replace_config(&cfg)?;

            tracing::info!(alias = %server.alias, "imported server configuration");
            println!("Imported configuration for {}", server.alias);
            println!("Next: salah sync");
        }

        Command::Sync { year } => {
            let cfg = load_config()?;
            let years = match year {
                Some(y) => vec![y],
                None => {
                    let today = resolve_now(None, cfg.tz()?)?.date();
                    default_sync_years(today)
                }
            };

            for y in years {
                let table = fetch::fetch_year(&cfg.server, y).await?;
                let path = state::write_cached_table(&cfg.location.alias, &table)?;
                println!("{}: {} days -> {}", y, table.len(), path.display());
            }
        }

        Command::Today { at, date } => {
            let cfg = load_config()?;
            let mut now = resolve_now(at.as_deref(), cfg.tz()?)?;
            if let Some(d) = date {
                now = d.and_time(now.time());
            }

            let settings = load_settings(&cfg.location.alias)?;
            let mut cache = YearCache::new();
            let day = data::load_day(&cfg, &mut cache, now.date(), cfg.server.is_configured()).await?;
            let board = build_board(&day, now, &settings)?;
            print!("{}", board.render_text(&cfg.location.alias));
        }

        Command::Next { at } => {
            let cfg = load_config()?;
            let now = resolve_now(at.as_deref(), cfg.tz()?)?;

            let settings = load_settings(&cfg.location.alias)?;
            let mut cache = YearCache::new();
            let day = data::load_day(&cfg, &mut cache, now.date(), cfg.server.is_configured()).await?;
            let board = build_board(&day, now, &settings)?;
            println!("{}", next_summary(&board));
        }

        Command::Settings { command } => {
            settings_cmd::run(command)?;
        }

        Command::Watch => {
            let cfg = load_config()?;
            let year = resolve_now(None, cfg.tz()?)?.year();
            if !cfg.server.is_configured() && !state::cache_path(&cfg.location.alias, year)?.exists() {
                bail!("nothing to show yet; run: salah setup && salah sync");
            }
            watch::run_watch(&cfg).await?;
        }
    }

    Ok(())
}

/// This year, and next year too once December starts.
fn default_sync_years(today: NaiveDate) -> Vec<i32> {
    let mut years = vec![today.year()];
    if today.month() == 12 {
        years.push(today.year() + 1);
    }
    years
}

fn next_summary(board: &board::Board) -> String {
    let current = board
        .result
        .current_prayer
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "next {} at {} in {} | current {}",
        board.result.next_prayer.name,
        salah_core::format_hhmm(board.result.next_prayer.instant.time()),
        board.countdown,
        current
    )
}
