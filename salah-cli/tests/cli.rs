use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

fn config_toml() -> &'static str {
    r#"
[location]
alias = "Dortmund"
timezone = "Europe/Berlin"

[server]
url = ""
api_key = "abcdef123456"
"#
}

fn cached_2024() -> &'static str {
    r#"{
  "year": 2024,
  "fetched_at_utc": null,
  "days": {
    "2024-07-28": { "Fadjr": "05:30", "Shuruk": "07:00", "Duhr": "13:30",
                    "Assr": "17:30", "Maghrib": "20:30", "Ishaa": "22:00",
                    "hijri": "1446/1/22" },
    "2024-07-29": { "Fadjr": "05:32", "Shuruk": "07:01", "Duhr": "13:30",
                    "Assr": "17:29", "Maghrib": "20:28", "Ishaa": "21:58",
                    "hijri": "1446/1/23" }
  }
}"#
}

fn seeded_home() -> TempDir {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("config.toml"), config_toml()).expect("write config");
    let cache = dir.path().join("cache").join("Dortmund");
    fs::create_dir_all(&cache).expect("cache dir");
    fs::write(cache.join("2024.json"), cached_2024()).expect("write cache");
    dir
}

fn salah(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("salah");
    cmd.env("SALAH_HOME", home).env_remove("SALAH_TRANSPORT_KEY");
    cmd
}

#[test]
fn today_marks_ishaa_late_in_the_evening() {
    let home = seeded_home();
    salah(home.path())
        .args(["today", "--at", "2024-07-28T23:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Prayer times Dortmund"))
        .stdout(predicate::str::contains("22 Muharram 1446 AH"))
        .stdout(predicate::str::contains("* Ishaa"))
        .stdout(predicate::str::contains("Next: Fadjr at 05:30 (in 06:30:00)"));
}

#[test]
fn next_prints_one_line_summary() {
    let home = seeded_home();
    salah(home.path())
        .args(["next", "--at", "2024-07-28T13:31"])
        .assert()
        .success()
        .stdout("next Assr at 17:30 in 03:59:00 | current Duhr\n");
}

#[test]
fn next_in_dead_zone_has_no_current() {
    let home = seeded_home();
    salah(home.path())
        .args(["next", "--at", "2024-07-28T13:25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("current -"));
}

#[test]
fn jamaa_offsets_are_saved_per_alias() {
    let home = seeded_home();
    salah(home.path())
        .args(["settings", "set", "--jamaa", "Duhr=+15", "--jumuah", "13:45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved settings for Dortmund"));

    salah(home.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jumuah_time: 13:45"))
        .stdout(predicate::str::contains("+15"));

    salah(home.path())
        .args(["today", "--at", "2024-07-28T12:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("13:30   +15 (13:45)"));
}

#[test]
fn negative_window_offset_is_rejected() {
    let home = seeded_home();
    salah(home.path())
        .args(["settings", "set", "--offset", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid window settings"));
}

#[test]
fn missing_year_points_at_sync() {
    let home = seeded_home();
    salah(home.path())
        .args(["today", "--at", "2023-03-01T10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("salah sync --year 2023"));
}

#[test]
fn import_with_short_key_fails() {
    let home = seeded_home();
    salah(home.path())
        .args(["import", "--payload", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=", "--key", "too-short"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("transport key must be 32 bytes"));
}

#[test]
fn config_show_masks_api_key() {
    let home = seeded_home();
    salah(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dortmund"))
        .stdout(predicate::str::contains("abcdef123456").not());
}

#[test]
fn oversized_window_offset_is_rejected_and_board_still_renders() {
    let home = seeded_home();
    salah(home.path())
        .args(["settings", "set", "--offset", "1000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 180 minutes"));

    salah(home.path())
        .args(["today", "--at", "2024-07-28T06:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Fadjr"));
}

#[test]
fn another_alias_does_not_see_previous_location_cache() {
    let home = seeded_home();
    fs::write(
        home.path().join("config.toml"),
        config_toml().replace("Dortmund", "Bochum"),
    )
    .expect("rewrite config");

    salah(home.path())
        .args(["today", "--at", "2024-07-28T12:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("salah sync --year 2024"));
}

#[test]
fn setup_with_new_server_drops_cached_tables() {
    let home = seeded_home();
    let cached = home.path().join("cache").join("Dortmund").join("2024.json");
    assert!(cached.exists());

    // Keep alias, timezone and key; point at a different server.
    salah(home.path())
        .arg("setup")
        .write_stdin("\n\nhttp://127.0.0.1:9/prayer-times\n\n")
        .assert()
        .success();

    assert!(!cached.exists());
    salah(home.path())
        .args(["today", "--at", "2024-07-28T12:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prayer-times request for 2024"));
}

#[test]
fn setup_keeping_server_keeps_cache() {
    let home = seeded_home();
    salah(home.path())
        .arg("setup")
        .write_stdin("\n\n\n\n")
        .assert()
        .success();

    assert!(home.path().join("cache").join("Dortmund").join("2024.json").exists());
}

#[test]
fn locked_settings_show_defaults_on_the_board() {
    let home = seeded_home();
    salah(home.path())
        .args(["settings", "set", "--jamaa", "Duhr=+15"])
        .assert()
        .success();
    salah(home.path())
        .args(["settings", "set", "--locked", "true"])
        .assert()
        .success();

    salah(home.path())
        .args(["today", "--at", "2024-07-28T12:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("13:30   +10 (13:40)"));

    salah(home.path())
        .args(["settings", "set", "--jamaa", "Duhr=+20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("locked"));
}
