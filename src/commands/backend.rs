//! Usage: Supervised-backend lifecycle / status commands.

use crate::app_state::BackendState;
use crate::backend::{BackendStatus, StopMode};
use crate::shared::mutex_ext::MutexExt;
use crate::{blocking, settings};
use tauri::Manager;

#[tauri::command]
pub(crate) fn backend_status_get(state: tauri::State<'_, BackendState>) -> BackendStatus {
    let manager = state.0.lock_or_recover();
    manager.status()
}

#[tauri::command]
pub(crate) async fn backend_start(app: tauri::AppHandle) -> Result<BackendStatus, String> {
    let cfg = blocking::run("backend_start_read_settings", {
        let app = app.clone();
        move || Ok(settings::read(&app).unwrap_or_default())
    })
    .await?;

    let state = app.state::<BackendState>();
    let mut manager = state.0.lock_or_recover();
    manager.start(&app, &cfg)
}

#[tauri::command]
pub(crate) async fn backend_stop(
    app: tauri::AppHandle,
    state: tauri::State<'_, BackendState>,
) -> Result<BackendStatus, String> {
    crate::app::cleanup::stop_backend_best_effort(&app, StopMode::Graceful).await;

    let manager = state.0.lock_or_recover();
    Ok(manager.status())
}

#[tauri::command]
pub(crate) async fn backend_restart(app: tauri::AppHandle) -> Result<BackendStatus, String> {
    tracing::info!("收到后端重启请求");
    crate::app::cleanup::stop_backend_best_effort(&app, StopMode::Graceful).await;
    backend_start(app).await
}
