use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use salah_ingest::YearCache;
use std::io::{self, Stdout};

use crate::board::{Board, build_board, resolve_now};
use crate::config::Config;
use crate::data::{DayData, load_day, refresh_year};
use crate::settings_cmd::load_settings;

/// Seconds each of the Gregorian and Hijri lines stays on screen.
const DATE_ALTERNATE_SECS: u32 = 5;

pub async fn run_watch(cfg: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = watch_loop(&mut terminal, cfg).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn watch_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, cfg: &Config) -> Result<()> {
    let tz = cfg.tz()?;
    let alias = cfg.location.alias.clone();
    let settings = load_settings(&alias)?;
    let mut cache = YearCache::new();

    let mut now = resolve_now(None, tz)?;
    let mut day = load_day(cfg, &mut cache, now.date(), true).await?;
    let mut status = String::new();

    tracing::info!(%alias, date = %day.date, "watch started");

    loop {
        now = resolve_now(None, tz)?;
        if now.date() != day.date {
            let date = now.date();
            cache.retain_years(&[
                (date - Duration::days(1)).year(),
                date.year(),
                (date + Duration::days(1)).year(),
            ]);
            day = load_day(cfg, &mut cache, date, true).await?;
            tracing::info!(date = %day.date, "day rolled over");
        }

        let board = build_board(&day, now, &settings)?;
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(4),
                    Constraint::Min(8),
                    Constraint::Length(4),
                    Constraint::Length(3),
                ])
                .split(f.area());

            f.render_widget(header(&board, &alias, now), chunks[0]);
            f.render_widget(prayer_table(&board), chunks[1]);
            f.render_widget(next_panel(&board), chunks[2]);

            let help = if status.is_empty() {
                "q=quit  r=re-sync".to_string()
            } else {
                format!("q=quit  r=re-sync  | {status}")
            };
            let footer = Paragraph::new(Span::styled(help, Style::default().fg(Color::Gray)))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(footer, chunks[3]);
        })?;

        if event::poll(std::time::Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('r') => {
                        status = resync(cfg, &mut cache, &mut day).await;
                    }
                    _ => {}
                }
            }
        }
    }

    tracing::info!("watch stopped");
    Ok(())
}

async fn resync(cfg: &Config, cache: &mut YearCache, day: &mut DayData) -> String {
    let date = day.date;
    match reload(cfg, cache, date).await {
        Ok(d) => {
            *day = d;
            format!("re-synced {}", date.year())
        }
        Err(e) => {
            tracing::warn!(year = date.year(), "re-sync failed: {e:#}");
            format!("re-sync failed: {e}")
        }
    }
}

async fn reload(cfg: &Config, cache: &mut YearCache, date: NaiveDate) -> Result<DayData> {
    refresh_year(cfg, cache, date.year()).await?;
    load_day(cfg, cache, date, true).await
}

/// Gregorian for the first half of each cycle, Hijri for the second.
fn date_line(board: &Board, now: NaiveDateTime) -> &str {
    if (now.second() / DATE_ALTERNATE_SECS) % 2 == 0 {
        &board.gregorian
    } else {
        &board.hijri
    }
}

fn header<'a>(board: &'a Board, alias: &str, now: NaiveDateTime) -> Paragraph<'a> {
    Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            format!("{alias}  {}", now.format("%H:%M:%S")),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            date_line(board, now).to_string(),
            Style::default().fg(Color::Cyan),
        )),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL))
}

fn prayer_table(board: &Board) -> Paragraph<'_> {
    let mut lines = Vec::with_capacity(board.rows.len() + 2);
    for r in &board.rows {
        let style = if r.active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let jamaa = r.jamaa.as_deref().unwrap_or("");
        lines.push(Line::from(Span::styled(
            format!(" {:<8} {}   {:>4}  {:<5} ", r.name.as_str(), r.time, r.offset, jamaa),
            style,
        )));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!(" Shuruk {}   Jumuah {}", board.shuruk, board.jumuah),
        Style::default().fg(Color::Gray),
    )));
    Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL).title("prayers"))
}

fn next_panel(board: &Board) -> Paragraph<'_> {
    let mut lines = vec![
        Line::raw(board.next_line()),
        Line::raw(format!("Current: {}", board.current_label())),
    ];
    if board.fallback_fadjr {
        lines[1]
            .spans
            .push(Span::styled("  (fallback Fadjr)", Style::default().fg(Color::Red)));
    }
    Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL).title("next"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings_cmd::LocalSettings;
    use crate::data::sample_day;

    fn board_at(h: u32, m: u32, s: u32) -> (Board, NaiveDateTime) {
        let day = sample_day();
        let now = day.date.and_hms_opt(h, m, s).unwrap();
        (build_board(&day, now, &LocalSettings::default()).unwrap(), now)
    }

    #[test]
    fn date_line_alternates_every_five_seconds() {
        let (b, now) = board_at(12, 0, 3);
        assert_eq!(date_line(&b, now), b.gregorian);
        let (b, now) = board_at(12, 0, 7);
        assert_eq!(date_line(&b, now), "22 Muharram 1446 AH");
        let (b, now) = board_at(12, 0, 11);
        assert_eq!(date_line(&b, now), b.gregorian);
    }
}
