//! Usage: Settings read/write commands.

use crate::{blocking, resident, settings};
use tauri::Manager;

#[tauri::command]
pub(crate) async fn settings_get(app: tauri::AppHandle) -> Result<settings::AppSettings, String> {
    blocking::run("settings_get", move || settings::read(&app)).await
}

#[tauri::command]
pub(crate) async fn settings_set(
    app: tauri::AppHandle,
    settings: settings::AppSettings,
) -> Result<settings::AppSettings, String> {
    let written = blocking::run("settings_set", {
        let app = app.clone();
        move || crate::settings::write(&app, &settings)
    })
    .await?;

    app.state::<resident::ResidentState>()
        .set_tray_enabled(written.tray_enabled);

    Ok(written)
}
