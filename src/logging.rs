use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::models::Summary;

/// Initialize structured logging system.
///
/// The returned guard flushes the file appender when dropped; hold it until
/// the program exits.
pub fn init_logging(log_level: Option<&str>, log_file: Option<&Path>, format: &str) -> Result<Option<WorkerGuard>> {
    // Set up environment filter
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = log_level.unwrap_or("info");
            EnvFilter::try_new(level)
        })
        .map_err(|e| anyhow::anyhow!("Failed to create log filter: {}", e))?;

    // Add console layer
    let console_layer = if format == "json" {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
            .boxed()
    };

    let registry = Registry::default().with(env_filter).with(console_layer);

    // Add file layer if log file is specified
    let guard = if let Some(log_path) = log_file {
        let directory = log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let file_name = log_path.file_name().map_or_else(|| "llmd-dataset.log".into(), |n| n.to_os_string());
        let file_appender = rolling::daily(directory, file_name);
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_appender)
            .with_ansi(false)
            .with_target(true)
            .json();

        registry
            .with(file_layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;
        Some(guard)
    } else {
        registry
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;
        None
    };

    info!("Logging system initialized");
    Ok(guard)
}

/// Wall-clock timer for one conversion run
pub struct RunTimer {
    start: Instant,
}

impl RunTimer {
    /// Start timing now
    #[must_use]
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    /// Log the run's duration together with its outcome counts
    pub fn finish(self, summary: &Summary) -> Duration {
        let elapsed = self.start.elapsed();
        info!(
            duration_ms = elapsed.as_millis(),
            files = summary.files_visited,
            processed = summary.processed_count,
            errors = summary.error_count,
            "Conversion run finished"
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_timer_reports_elapsed_time() {
        let timer = RunTimer::start();
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.finish(&Summary::default()) >= Duration::from_millis(5));
    }
}
