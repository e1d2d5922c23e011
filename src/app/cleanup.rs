//! Usage: Best-effort cleanup hooks for app lifecycle events (exit/quit/panic).

use super::app_state::BackendState;
use crate::backend::StopMode;
use crate::shared::mutex_ext::MutexExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tauri::Manager;

static CLEANUP_STARTED: AtomicBool = AtomicBool::new(false);

/// The one shutdown procedure. Safe to call from several places concurrently
/// (window close, quit command, panic hook): only the first caller acts.
pub(crate) async fn cleanup_before_exit(app: &tauri::AppHandle, mode: StopMode) {
    if !enter_once(&CLEANUP_STARTED) {
        return;
    }
    stop_backend_best_effort(app, mode).await;
}

/// Returns `true` for exactly one caller, no matter how many race on `flag`.
fn enter_once(flag: &AtomicBool) -> bool {
    !flag.swap(true, Ordering::SeqCst)
}

/// Stops the supervised backend: signals the supervision task and waits for it
/// to wind down. Graceful mode waits out the child's grace period; forced mode
/// escalates to aborting the task, which hard-kills the child.
pub(crate) async fn stop_backend_best_effort(app: &tauri::AppHandle, mode: StopMode) {
    let running = {
        let state = app.state::<BackendState>();
        let mut manager = state.0.lock_or_recover();
        manager.take_running()
    };

    let Some(running) = running else {
        return;
    };

    let _ = running.stop.send(Some(mode));

    let stop_timeout = match mode {
        StopMode::Graceful => Duration::from_secs(15),
        StopMode::Force => Duration::from_secs(2),
    };

    let mut task = running.task;
    if tokio::time::timeout(stop_timeout, &mut task).await.is_err() {
        tracing::warn!("退出清理：后端停止超时，中止监督任务");
        task.abort();

        // Dropping the supervision task drops the child handle, which kills it.
        let _ = tokio::time::timeout(Duration::from_secs(1), &mut task).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_once_admits_exactly_one_concurrent_caller() {
        let flag = AtomicBool::new(false);
        let admitted = std::sync::atomic::AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    if enter_once(&flag) {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::SeqCst), 1);
        assert!(!enter_once(&flag));
    }
}
