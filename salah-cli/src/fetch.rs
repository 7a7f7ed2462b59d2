use anyhow::{Context, Result, bail};
use chrono::Utc;
use salah_ingest::{YearlyTable, parse_yearly_json};
use std::time::Duration;

use crate::config::ServerSection;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Download and validate one year of prayer times.
pub async fn fetch_year(server: &ServerSection, year: i32) -> Result<YearlyTable> {
    if !server.is_configured() {
        bail!("no server configured; run: salah setup (or salah import --payload ...)");
    }

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("build http client")?;

    tracing::info!(year, url = %server.url, "fetching yearly prayer times");

    let resp = client
        .get(server.url.trim())
        .query(&[("year", year)])
        .header("X-API-KEY", server.api_key.as_str())
        .send()
        .await
        .with_context(|| format!("prayer-times request for {year}"))?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        tracing::warn!(year, %status, "prayer-times request failed");
        bail!("prayer-times API error: {status} {txt}");
    }

    let body = resp.text().await.context("read prayer-times response")?;
    let mut table = parse_yearly_json(&body, year)?;
    table.fetched_at_utc = Some(Utc::now());

    tracing::info!(year, days = table.len(), "fetched yearly prayer times");
    Ok(table)
}
