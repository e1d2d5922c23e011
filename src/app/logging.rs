//! Usage: Process-wide tracing setup (stderr + daily-rotated file sink).

use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "device-console.log";
const ENV_FILTER_VAR: &str = "DEVICE_CONSOLE_LOG";

// The non-blocking writer stops flushing once its guard drops; keep it for the
// process lifetime.
static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

pub(crate) fn init(app: &tauri::AppHandle) {
    let filter =
        EnvFilter::try_from_env(ENV_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match crate::app_paths::logs_dir(app) {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
        }
        Err(err) => {
            eprintln!("failed to prepare log dir: {err}");
            None
        }
    };

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .is_ok();

    if !initialized {
        // A second init (tests, restarts) keeps the original subscriber.
        return;
    }

    if let Err(err) = tracing_log::LogTracer::init() {
        tracing::warn!("log 桥接初始化失败: {}", err);
    }
}

/// Deletes rotated log files older than the retention window. Best-effort;
/// returns the number of files removed.
pub(crate) fn prune_old_logs(dir: &Path, retention_days: u32) -> usize {
    let cutoff = Duration::from_secs(retention_days as u64 * 24 * 60 * 60);
    let now = SystemTime::now();

    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(LOG_FILE_PREFIX))
            .unwrap_or(false);
        if !is_log {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|meta| meta.modified()) else {
            continue;
        };
        let expired = now
            .duration_since(modified)
            .map(|age| age > cutoff)
            .unwrap_or(false);
        if expired && std::fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }

    if removed > 0 {
        tracing::info!(removed = removed, "已清理过期日志文件");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_keeps_recent_files_and_ignores_foreign_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = dir.path().join(format!("{LOG_FILE_PREFIX}.2026-08-06"));
        let other = dir.path().join("unrelated.txt");
        std::fs::write(&log, "line").expect("write");
        std::fs::write(&other, "keep").expect("write");

        // Freshly created files are inside any sane retention window.
        assert_eq!(prune_old_logs(dir.path(), 1), 0);
        assert!(log.exists());
        assert!(other.exists());
    }
}
