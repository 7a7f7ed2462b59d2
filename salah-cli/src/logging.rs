use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::state::logs_dir;

const DEFAULT_FILTER: &str = "salah_cli=info,salah_ingest=info";

/// Daily-rolling file log under `~/.salah/logs`. Stdout stays free for command output.
///
/// Keep the returned guard alive for the life of the process; dropping it flushes the writer.
pub fn init() -> Result<WorkerGuard> {
    let dir = logs_dir()?;
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::daily(&dir, "salah.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("SALAH_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .try_init()?;

    Ok(guard)
}
