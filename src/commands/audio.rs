//! Usage: Volume / mute commands.

use super::dispatch;
use crate::domain::intent::{clamp_volume_level, Intent};
use crate::domain::result::ControlResult;

#[tauri::command]
pub(crate) async fn system_volume_get() -> ControlResult {
    dispatch(&Intent::GetVolume).await
}

#[tauri::command]
pub(crate) async fn system_volume_set(level: i64) -> ControlResult {
    // Contract: out-of-range levels are clamped to [0, 100], not rejected.
    let level = clamp_volume_level(level);
    dispatch(&Intent::SetVolume(level)).await
}

#[tauri::command]
pub(crate) async fn system_mute_toggle() -> ControlResult {
    dispatch(&Intent::ToggleMute).await
}
