//! Usage: Wi-Fi and network-interface commands.

use super::dispatch;
use crate::domain::intent::Intent;
use crate::domain::result::ControlResult;

#[tauri::command]
pub(crate) async fn wifi_scan() -> ControlResult {
    dispatch(&Intent::ScanWifi).await
}

#[tauri::command]
pub(crate) async fn wifi_connect(
    ssid: String,
    password: Option<String>,
    auto_connect: Option<bool>,
    hidden: Option<bool>,
) -> ControlResult {
    let ssid = ssid.trim().to_string();
    if ssid.is_empty() {
        return ControlResult::fail("SEC_INVALID_INPUT: ssid is required");
    }
    let password = password
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    if auto_connect == Some(false) {
        // Profiles created by the platform tooling reconnect automatically;
        // opting out is not wired through to the platform layer.
        tracing::warn!(ssid = %ssid, "autoConnect=false 暂不生效，连接配置仍会自动重连");
    }
    // Policy: connect targets are treated as hidden unless the caller says
    // otherwise, so non-broadcasting networks keep working out of the box.
    let hidden = hidden.unwrap_or(true);

    dispatch(&Intent::ConnectWifi {
        ssid,
        password,
        hidden,
    })
    .await
}

#[tauri::command]
pub(crate) async fn wifi_disconnect() -> ControlResult {
    dispatch(&Intent::DisconnectWifi).await
}

#[tauri::command]
pub(crate) async fn wifi_current_get() -> ControlResult {
    dispatch(&Intent::GetCurrentWifiConnection).await
}

#[tauri::command]
pub(crate) async fn network_interfaces_get() -> ControlResult {
    dispatch(&Intent::GetNetworkInterfaces).await
}
