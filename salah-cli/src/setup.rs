use anyhow::Result;
use std::io::{self, Write};

use crate::config::{Config, config_path, load_config, mask_secret, parse_tz, replace_config};

fn prompt(label: &str, current: &str) -> Result<String> {
    if current.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, current);
    }
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Blank input keeps the current value.
fn keep_or(input: String, current: &str) -> String {
    if input.is_empty() {
        current.to_string()
    } else {
        input
    }
}

pub fn run_setup() -> Result<()> {
    println!("Salah setup\n");
    let current = load_config()?;
    let mut cfg = Config::default();

    cfg.location.alias = keep_or(
        prompt("Location alias", &current.location.alias)?,
        &current.location.alias,
    );

    loop {
        let tz = keep_or(
            prompt("Timezone (IANA, e.g. Europe/Berlin)", &current.location.timezone)?,
            &current.location.timezone,
        );
        match parse_tz(&tz) {
            Ok(_) => {
                cfg.location.timezone = tz;
                break;
            }
            Err(e) => println!("{e}"),
        }
    }

    cfg.server.url = keep_or(prompt("Server URL", &current.server.url)?, &current.server.url);
    cfg.server.api_key = keep_or(
        prompt("API key", &mask_secret(&current.server.api_key))?,
        &current.server.api_key,
    );

    replace_config(&cfg)?;

    println!("\nWrote:");
    println!("- {}", config_path()?.display());

    println!("\nNext recommended steps:");
    if cfg.server.is_configured() {
        println!("- salah sync            (download this year's prayer times)");
    } else {
        println!("- salah import --payload <blob>   (if you were given an encrypted config)");
    }
    println!("- salah settings show   (window and jama'a settings for {})", cfg.location.alias);
    println!("- salah watch");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keeps_current() {
        assert_eq!(keep_or(String::new(), "Dortmund"), "Dortmund");
        assert_eq!(keep_or("Bochum".into(), "Dortmund"), "Bochum");
    }
}
