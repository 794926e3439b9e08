//! Tracing subscriber setup

use crate::config::LoggingSection;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "radium=info";
const LOG_FILE_PREFIX: &str = "radium-queued.log";

/// Install the global subscriber. The returned guard flushes the file
/// writer and must live until shutdown.
pub fn init(settings: &LoggingSection) -> Result<Option<WorkerGuard>> {
    let format = std::env::var("RADIUM_LOG_FORMAT")
        .ok()
        .or_else(|| settings.format.clone())
        .unwrap_or_else(|| "pretty".to_string());
    let json = format.eq_ignore_ascii_case("json");

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    let stdout = if json {
        // Production: JSON structured logging
        fmt::layer().json().boxed()
    } else {
        fmt::layer().pretty().boxed()
    };

    let (file, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = if json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout)
        .with(file)
        .with(env_filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
