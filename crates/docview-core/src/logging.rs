//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/docview/logs/` so stdout stays free
/// for exported HTML and headless JSON.
/// Log level is controlled by `DOCVIEW_LOG` environment variable.
///
/// # Examples
/// ```bash
/// DOCVIEW_LOG=debug cargo run -- --headless ./site
/// DOCVIEW_LOG=docview_app=trace cargo run -- --export out ./site
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "docview.log");

    // Default to info, allow override via DOCVIEW_LOG
    let env_filter = EnvFilter::try_from_env("DOCVIEW_LOG")
        .unwrap_or_else(|_| EnvFilter::new("docview=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("docview {} logging to {}", env!("CARGO_PKG_VERSION"), log_dir.display());

    Ok(())
}

/// Directory the rolling log files go to
pub fn log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("docview").join("logs")
}
