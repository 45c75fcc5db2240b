use std::path::Path;

use color_eyre::eyre::eyre;
use labnote_core::config::Config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LABNOTE_LOG";

/// Install the global subscriber writing to the configured log file.
///
/// Logs go to a file so the palette's alternate screen stays clean. The
/// returned guard flushes the writer on drop and must outlive the program.
pub fn init(config: &Config) -> color_eyre::Result<WorkerGuard> {
    let path = config.log_path();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "labnote.log".into());

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| eyre!("failed to install logger: {e}"))?;

    tracing::info!(log = %path.display(), "labnote started");
    Ok(guard)
}
