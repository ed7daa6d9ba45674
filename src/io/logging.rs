use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::model::config::LogConfig;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "TICK_LOG";

/// Log file name inside the data directory
pub const LOG_FILE: &str = "tick.log";

/// Install a file subscriber writing to `<data_dir>/tick.log`.
///
/// The terminal belongs to the TUI, so nothing is logged to stderr.
/// `TICK_LOG` overrides `[log] level`. Keep the returned guard alive for
/// the life of the process; dropping it flushes pending lines.
pub fn init_logging(data_dir: &Path, config: &LogConfig) -> Result<WorkerGuard, String> {
    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), &config.level)?;

    std::fs::create_dir_all(data_dir).map_err(|e| format!("create log dir failed: {}", e))?;
    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())?;
    Ok(guard)
}

/// The environment directive wins when set and non-blank
fn build_filter(env: Option<&str>, configured: &str) -> Result<EnvFilter, String> {
    let directive = match env.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => configured.trim(),
    };
    EnvFilter::try_new(directive).map_err(|e| format!("invalid log filter '{}': {}", directive, e))
}
