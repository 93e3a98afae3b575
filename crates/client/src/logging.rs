//! Tracing setup: stderr plus a per-session log file.
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::dirs;

/// Installs the global subscriber.
///
/// `RUST_LOG` selects what is recorded (default `info`). The returned guard
/// flushes the file writer on drop, so keep it alive until exit.
pub fn setup_logging(session_id: &str) -> Result<WorkerGuard> {
    let session_log_dir = dirs::log_dir().join(session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!("failed to create log directory {}", session_log_dir.display())
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "playtest.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    // stdout carries command output, so human-readable logs go to stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("tracing subscriber already installed")?;

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/playtest.log", session_log_dir.display());

    Ok(guard)
}
