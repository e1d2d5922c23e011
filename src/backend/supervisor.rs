//! Usage: Backend child-process lifecycle (state machine, restart policy, health probing).
//!
//! 状态机：Idle → Locating → Validating → Starting → Running → (Degraded) → Stopped，
//! 终止态 Failed。子进程句柄只属于监督任务本身，Façade 与清理逻辑只发送意图。

use crate::domain::command::ExternalCommand;
use crate::executor;
use crate::notice;
use crate::settings::AppSettings;
use crate::shared::mutex_ext::MutexExt;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tauri::Emitter;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio::sync::watch;

use super::health::{self, HealthStatus};
use super::{locate, runtime};

pub(crate) const STATUS_EVENT: &str = "backend:status";

const RESTART_BACKOFF_CAP: Duration = Duration::from_secs(80);
// A child that stayed up this long counts as a good run; the attempt counter resets.
const STABLE_UPTIME_RESET: Duration = Duration::from_secs(60);
const GRACEFUL_EXIT_GRACE: Duration = Duration::from_secs(10);
const SIGNAL_TIMEOUT: Duration = Duration::from_secs(5);

const PATH_LIST_SEP: char = if cfg!(windows) { ';' } else { ':' };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Phase {
    #[default]
    Idle,
    Locating,
    Validating,
    Starting,
    Running,
    Degraded,
    Stopped,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum FailureReason {
    NotFound,
    RuntimeMissing,
    SpawnError,
    MaxRetriesExceeded,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BackendStatus {
    pub phase: Phase,
    pub failure: Option<FailureReason>,
    pub entry_path: Option<String>,
    pub runtime: Option<String>,
    pub pid: Option<u32>,
    pub restart_attempts: u32,
    pub last_exit_code: Option<i32>,
    pub health: Option<HealthStatus>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopMode {
    Graceful,
    Force,
}

enum WaitOutcome {
    Exited(std::io::Result<std::process::ExitStatus>),
    StopRequested(StopMode),
}

#[derive(Default)]
struct Shared {
    status: Mutex<BackendStatus>,
    // Spawn generation; health probes from an older generation are discarded.
    epoch: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
struct SupervisorConfig {
    port: u16,
    probe_delay: Duration,
    backoff_base: Duration,
    max_attempts: u32,
}

impl SupervisorConfig {
    fn from_settings(settings: &AppSettings) -> Self {
        Self {
            port: settings.backend_port,
            probe_delay: Duration::from_secs(settings.health_probe_delay_seconds as u64),
            backoff_base: Duration::from_secs(settings.restart_backoff_seconds as u64),
            max_attempts: settings.restart_max_attempts,
        }
    }
}

pub(crate) struct RunningBackend {
    pub(crate) stop: watch::Sender<Option<StopMode>>,
    pub(crate) task: tauri::async_runtime::JoinHandle<()>,
}

#[derive(Default)]
pub(crate) struct BackendSupervisor {
    shared: Arc<Shared>,
    running: Option<RunningBackend>,
}

impl BackendSupervisor {
    pub(crate) fn status(&self) -> BackendStatus {
        self.shared.status.lock_or_recover().clone()
    }

    /// Starts the supervision task. At most one task (and one child) exists at
    /// a time: a start while the previous one is alive is rejected.
    pub(crate) fn start(
        &mut self,
        app: &tauri::AppHandle,
        settings: &AppSettings,
    ) -> Result<BackendStatus, String> {
        if self.running.is_some() {
            let phase = self.shared.status.lock_or_recover().phase;
            if !matches!(phase, Phase::Stopped | Phase::Failed) {
                return Err("backend is already running".to_string());
            }
            // Terminal phase: the old task has fully observed its child's exit.
            self.running = None;
        }

        {
            let mut status = self.shared.status.lock_or_recover();
            *status = BackendStatus {
                port: Some(settings.backend_port),
                ..BackendStatus::default()
            };
        }

        let (stop_tx, stop_rx) = watch::channel(None);
        let cfg = SupervisorConfig::from_settings(settings);
        let task = tauri::async_runtime::spawn(run_loop(
            app.clone(),
            Arc::clone(&self.shared),
            cfg,
            stop_rx,
        ));
        self.running = Some(RunningBackend { stop: stop_tx, task });
        tracing::info!(port = settings.backend_port, "后端监督任务已启动");

        Ok(self.status())
    }

    /// Hands the stop channel and task handle to the caller (the cleanup path).
    /// Further autostart is the caller's decision; the supervisor itself never
    /// restarts after a requested stop.
    pub(crate) fn take_running(&mut self) -> Option<RunningBackend> {
        self.running.take()
    }
}

async fn run_loop(
    app: tauri::AppHandle,
    shared: Arc<Shared>,
    cfg: SupervisorConfig,
    mut stop_rx: watch::Receiver<Option<StopMode>>,
) {
    let health_client = reqwest::Client::new();
    let mut attempts: u32 = 0;

    loop {
        if stop_rx.borrow().is_some() {
            update_status(&app, &shared, |s| s.phase = Phase::Stopped);
            return;
        }

        update_status(&app, &shared, |s| s.phase = Phase::Locating);
        let candidates = locate::candidate_paths(&app);
        let Some(entry) = locate::resolve_entry(&candidates) else {
            let searched: Vec<String> =
                candidates.iter().map(|p| p.display().to_string()).collect();
            tracing::error!(candidates = ?searched, "后端入口定位失败");
            fail_terminal(
                &app,
                &shared,
                FailureReason::NotFound,
                &format!("未找到后端入口（已检查 {} 个候选位置）", searched.len()),
            );
            return;
        };
        update_status(&app, &shared, |s| {
            s.entry_path = Some(entry.display().to_string());
            s.phase = Phase::Validating;
        });

        let runtime = match runtime::resolve_runtime().await {
            Ok(runtime) => runtime,
            Err(err) => {
                fail_terminal(
                    &app,
                    &shared,
                    FailureReason::RuntimeMissing,
                    &format!("后端运行时不可用: {err}"),
                );
                return;
            }
        };
        tracing::info!(runtime = %runtime.command, version = %runtime.version, "后端运行时校验通过");
        update_status(&app, &shared, |s| {
            s.runtime = Some(runtime.command.clone());
            s.phase = Phase::Starting;
        });

        let Some(backend_dir) = entry.parent().map(Path::to_path_buf) else {
            fail_terminal(
                &app,
                &shared,
                FailureReason::NotFound,
                &format!("后端入口缺少父目录: {}", entry.display()),
            );
            return;
        };
        let envs = backend_environment(&backend_dir, cfg.port);
        let args = vec![entry.display().to_string()];

        let mut child =
            match executor::spawn_long_lived(&runtime.command, &args, &backend_dir, &envs) {
                Ok(child) => child,
                Err(err) => {
                    tracing::error!("后端进程启动失败: {}", err);
                    update_status(&app, &shared, |s| {
                        s.phase = Phase::Failed;
                        s.failure = Some(FailureReason::SpawnError);
                    });
                    if !backoff_or_stop(&app, &shared, &cfg, &mut attempts, &mut stop_rx).await {
                        return;
                    }
                    continue;
                }
            };

        let pid = child.id();
        spawn_output_readers(&mut child);

        // Optimistic: a spawn without synchronous error counts as Running.
        let epoch = shared.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        update_status(&app, &shared, |s| {
            s.phase = Phase::Running;
            s.failure = None;
            s.pid = pid;
            s.health = None;
            s.restart_attempts = attempts;
        });
        tracing::info!(pid = ?pid, "后端进程已启动");
        spawn_health_probe(
            app.clone(),
            Arc::clone(&shared),
            health_client.clone(),
            epoch,
            cfg.probe_delay,
            cfg.port,
        );

        let started_at = Instant::now();
        let outcome = tokio::select! {
            exit = child.wait() => WaitOutcome::Exited(exit),
            mode = wait_for_stop(&mut stop_rx) => WaitOutcome::StopRequested(mode),
        };

        let exit = match outcome {
            WaitOutcome::StopRequested(mode) => {
                shutdown_child(child, mode).await;
                update_status(&app, &shared, |s| {
                    s.phase = Phase::Stopped;
                    s.pid = None;
                });
                tracing::info!("后端进程已按请求停止");
                return;
            }
            WaitOutcome::Exited(exit) => exit,
        };

        match exit {
            Ok(status) if status.success() => {
                tracing::info!("后端进程正常退出");
                update_status(&app, &shared, |s| {
                    s.phase = Phase::Stopped;
                    s.pid = None;
                    s.last_exit_code = Some(0);
                });
                return;
            }
            Ok(status) => {
                let code = status.code();
                tracing::warn!(exit_code = ?code, "后端进程异常退出");
                update_status(&app, &shared, |s| {
                    s.phase = Phase::Failed;
                    s.failure = None;
                    s.pid = None;
                    s.last_exit_code = code;
                });
            }
            Err(err) => {
                tracing::error!("等待后端进程退出失败: {}", err);
                update_status(&app, &shared, |s| {
                    s.phase = Phase::Failed;
                    s.failure = None;
                    s.pid = None;
                });
            }
        }

        if started_at.elapsed() >= STABLE_UPTIME_RESET {
            attempts = 0;
        }
        if !backoff_or_stop(&app, &shared, &cfg, &mut attempts, &mut stop_rx).await {
            return;
        }
    }
}

/// Waits until a stop request arrives; a dropped sender counts as a forced stop.
async fn wait_for_stop(rx: &mut watch::Receiver<Option<StopMode>>) -> StopMode {
    loop {
        if let Some(mode) = *rx.borrow() {
            return mode;
        }
        if rx.changed().await.is_err() {
            return StopMode::Force;
        }
    }
}

/// Bumps the attempt counter and sleeps the backoff interval. Returns `false`
/// when the loop must end (attempt cap reached or a stop request won the race).
async fn backoff_or_stop(
    app: &tauri::AppHandle,
    shared: &Shared,
    cfg: &SupervisorConfig,
    attempts: &mut u32,
    stop_rx: &mut watch::Receiver<Option<StopMode>>,
) -> bool {
    *attempts += 1;
    if *attempts > cfg.max_attempts {
        fail_terminal(
            app,
            shared,
            FailureReason::MaxRetriesExceeded,
            &format!("后端连续崩溃 {} 次，已停止重试", cfg.max_attempts),
        );
        return false;
    }
    update_status(app, shared, |s| s.restart_attempts = *attempts);

    let delay = backoff_delay(cfg.backoff_base, *attempts, RESTART_BACKOFF_CAP);
    tracing::info!(
        attempt = *attempts,
        max_attempts = cfg.max_attempts,
        "{} 秒后重启后端",
        delay.as_secs()
    );
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = wait_for_stop(stop_rx) => {
            update_status(app, shared, |s| s.phase = Phase::Stopped);
            tracing::info!("重启等待期间收到停止请求，放弃重启");
            false
        }
    }
}

fn backoff_delay(base: Duration, attempt: u32, cap: Duration) -> Duration {
    let shift = attempt.saturating_sub(1).min(16);
    let factor = 1u32 << shift;
    base.saturating_mul(factor).min(cap)
}

fn join_pythonpath(backend_dir: &str, existing: Option<&str>) -> String {
    match existing {
        Some(existing) if !existing.is_empty() => {
            format!("{backend_dir}{PATH_LIST_SEP}{existing}")
        }
        _ => backend_dir.to_string(),
    }
}

/// Environment augmentation so the backend can locate its own modules and port.
fn backend_environment(backend_dir: &Path, port: u16) -> Vec<(String, String)> {
    let dir = backend_dir.display().to_string();
    let existing = std::env::var("PYTHONPATH").ok();
    vec![
        (
            "PYTHONPATH".to_string(),
            join_pythonpath(&dir, existing.as_deref()),
        ),
        ("PYTHONUNBUFFERED".to_string(), "1".to_string()),
        ("DEVICE_CONSOLE_BACKEND_PORT".to_string(), port.to_string()),
    ]
}

fn spawn_output_readers(child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        tauri::async_runtime::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::info!(source = "backend", "{}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        tauri::async_runtime::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::warn!(source = "backend", "{}", line);
            }
        });
    }
}

fn spawn_health_probe(
    app: tauri::AppHandle,
    shared: Arc<Shared>,
    client: reqwest::Client,
    epoch: u64,
    delay: Duration,
    port: u16,
) {
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(delay).await;
        let health = health::probe(&client, port).await;

        // The probe is advisory and fire-and-forget: a result from a previous
        // generation, or one arriving after the child moved on, is discarded.
        if shared.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }
        let snapshot = {
            let mut status = shared.status.lock_or_recover();
            if !matches!(status.phase, Phase::Running | Phase::Degraded) {
                return;
            }
            status.health = Some(health);
            if !health.reachable {
                status.phase = Phase::Degraded;
            } else if status.phase == Phase::Degraded {
                status.phase = Phase::Running;
            }
            status.clone()
        };
        if !health.reachable {
            tracing::warn!(status_code = ?health.status_code, "后端健康检查未通过（仅记录，不会停止进程）");
        }
        emit_status(&app, &snapshot);
    });
}

/// Graceful: cooperative termination signal, bounded grace, then hard kill.
/// Force: straight to the hard kill.
async fn shutdown_child(mut child: Child, mode: StopMode) {
    if mode == StopMode::Graceful {
        send_terminate_signal(&child).await;
        match tokio::time::timeout(GRACEFUL_EXIT_GRACE, child.wait()).await {
            Ok(_) => return,
            Err(_) => tracing::warn!("后端未在宽限期内退出，强制终止"),
        }
    }
    let _ = child.start_kill();
    let _ = tokio::time::timeout(Duration::from_secs(2), child.wait()).await;
}

#[cfg(unix)]
fn terminate_command(pid: u32) -> ExternalCommand {
    ExternalCommand::with_args("kill", vec!["-TERM".to_string(), pid.to_string()])
}

// Windows has no cooperative signal for console-less children; taskkill /T /F
// takes down the whole process tree.
#[cfg(windows)]
fn terminate_command(pid: u32) -> ExternalCommand {
    ExternalCommand::with_args(
        "taskkill",
        vec![
            "/PID".to_string(),
            pid.to_string(),
            "/T".to_string(),
            "/F".to_string(),
        ],
    )
}

async fn send_terminate_signal(child: &Child) {
    let Some(pid) = child.id() else {
        return;
    };
    let step = terminate_command(pid);
    if let Err(err) = executor::run(&step, SIGNAL_TIMEOUT).await {
        tracing::warn!(pid = pid, "发送终止信号失败: {}", err);
    }
}

fn update_status(
    app: &tauri::AppHandle,
    shared: &Shared,
    apply: impl FnOnce(&mut BackendStatus),
) {
    let snapshot = {
        let mut status = shared.status.lock_or_recover();
        apply(&mut status);
        status.clone()
    };
    emit_status(app, &snapshot);
}

fn emit_status(app: &tauri::AppHandle, snapshot: &BackendStatus) {
    if let Err(err) = app.emit(STATUS_EVENT, snapshot.clone()) {
        tracing::warn!("后端状态事件发送失败: {}", err);
    }
}

fn fail_terminal(
    app: &tauri::AppHandle,
    shared: &Shared,
    reason: FailureReason,
    message: &str,
) {
    tracing::error!("后端监督终止: {}", message);
    update_status(app, shared, |s| {
        s.phase = Phase::Failed;
        s.failure = Some(reason);
        s.pid = None;
    });
    let _ = notice::emit(app, notice::Notice::backend_fault(message));
}
