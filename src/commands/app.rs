//! Usage: App-level Tauri commands (status info, lifecycle, external links, notices).

use crate::domain::result::ControlResult;
use crate::notice;
use tauri::utils::config::BundleType;
use tauri::Emitter;

pub(crate) const WILL_QUIT_EVENT: &str = "app:will-quit";

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppStatus {
    is_dev: bool,
    platform: String,
    version: String,
    app_type: String,
    machine_type: String,
}

#[tauri::command]
pub(crate) fn app_status_get() -> AppStatus {
    let bundle_type = tauri::utils::platform::bundle_type();
    let app_type = match bundle_type {
        Some(BundleType::Nsis | BundleType::Msi | BundleType::Deb | BundleType::Rpm) => "installer",
        Some(BundleType::AppImage) => "portable",
        Some(BundleType::App | BundleType::Dmg) => "bundle",
        None => "dev",
    }
    .to_string();

    AppStatus {
        is_dev: cfg!(debug_assertions),
        platform: std::env::consts::OS.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_type,
        machine_type: std::env::consts::ARCH.to_string(),
    }
}

#[tauri::command]
pub(crate) fn app_quit(app: tauri::AppHandle) -> Result<bool, String> {
    let _ = app.emit(WILL_QUIT_EVENT, "graceful");
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(200));
        // The exit-requested handler runs the graceful shutdown procedure.
        app.exit(0);
    });
    Ok(true)
}

#[tauri::command]
pub(crate) fn app_force_quit(app: tauri::AppHandle) -> Result<bool, String> {
    let _ = app.emit(WILL_QUIT_EVENT, "forced");
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(200));
        tauri::async_runtime::block_on(crate::app::cleanup::cleanup_before_exit(
            &app,
            crate::backend::StopMode::Force,
        ));
        std::process::exit(0);
    });
    Ok(true)
}

#[tauri::command]
pub(crate) fn link_open_external(url: String) -> ControlResult {
    let parsed = match reqwest::Url::parse(url.trim()) {
        Ok(parsed) => parsed,
        Err(err) => {
            return ControlResult::fail(format!("SEC_INVALID_INPUT: invalid url={url}: {err}"))
        }
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return ControlResult::fail(format!(
            "SEC_INVALID_INPUT: only http/https links may be opened, got {}",
            parsed.scheme()
        ));
    }

    match tauri_plugin_opener::open_url(parsed.as_str(), None::<&str>) {
        Ok(()) => ControlResult::ok_empty(),
        Err(err) => ControlResult::fail(format!("OPEN_LINK: {err}")),
    }
}

#[tauri::command]
pub(crate) fn notice_send(
    app: tauri::AppHandle,
    level: notice::NoticeLevel,
    title: Option<String>,
    body: String,
) -> Result<(), String> {
    notice::emit(&app, notice::Notice::new(level, title, body))
}
