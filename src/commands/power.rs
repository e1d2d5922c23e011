//! Usage: Host power-state commands (shutdown / restart / sleep).

use super::dispatch;
use crate::domain::intent::Intent;

async fn power_intent(intent: Intent) -> Result<bool, String> {
    let result = dispatch(&intent).await;
    if result.success {
        Ok(true)
    } else {
        Err(result
            .error
            .unwrap_or_else(|| "unknown error".to_string()))
    }
}

#[tauri::command]
pub(crate) async fn system_shutdown() -> Result<bool, String> {
    tracing::info!("收到关机请求");
    power_intent(Intent::Shutdown).await
}

#[tauri::command]
pub(crate) async fn system_restart() -> Result<bool, String> {
    tracing::info!("收到重启请求");
    power_intent(Intent::Restart).await
}

#[tauri::command]
pub(crate) async fn system_sleep() -> Result<bool, String> {
    tracing::info!("收到休眠请求");
    power_intent(Intent::Sleep).await
}
