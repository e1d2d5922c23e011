//! Usage: Persisted application settings (schema + read/write helpers).

use crate::app_paths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SCHEMA_VERSION: u32 = 2;
const SCHEMA_VERSION_ADD_RESTART_POLICY: u32 = 2;
pub const DEFAULT_BACKEND_PORT: u16 = 8600;
const DEFAULT_HEALTH_PROBE_DELAY_SECONDS: u32 = 3;
const DEFAULT_RESTART_BACKOFF_SECONDS: u32 = 5;
const DEFAULT_RESTART_MAX_ATTEMPTS: u32 = 8;
const DEFAULT_LOG_RETENTION_DAYS: u32 = 30;
const MAX_HEALTH_PROBE_DELAY_SECONDS: u32 = 60;
const MAX_RESTART_BACKOFF_SECONDS: u32 = 300;
const MAX_RESTART_MAX_ATTEMPTS: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub schema_version: u32,
    // Local port the supervised backend serves on (also used by the health probe).
    pub backend_port: u16,
    pub backend_autostart: bool,
    pub health_probe_delay_seconds: u32,
    // Restart policy for the supervised backend (base backoff, doubled per attempt).
    pub restart_backoff_seconds: u32,
    pub restart_max_attempts: u32,
    pub tray_enabled: bool,
    pub log_retention_days: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            backend_port: DEFAULT_BACKEND_PORT,
            backend_autostart: true,
            health_probe_delay_seconds: DEFAULT_HEALTH_PROBE_DELAY_SECONDS,
            restart_backoff_seconds: DEFAULT_RESTART_BACKOFF_SECONDS,
            restart_max_attempts: DEFAULT_RESTART_MAX_ATTEMPTS,
            tray_enabled: true,
            log_retention_days: DEFAULT_LOG_RETENTION_DAYS,
        }
    }
}

fn settings_path(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    Ok(app_paths::app_data_dir(app)?.join("settings.json"))
}

fn parse_settings_json(content: &str) -> Result<(AppSettings, bool), String> {
    let raw: serde_json::Value =
        serde_json::from_str(content).map_err(|e| format!("failed to parse settings.json: {e}"))?;
    let schema_version_present = raw.get("schema_version").is_some();
    let settings: AppSettings =
        serde_json::from_value(raw).map_err(|e| format!("failed to parse settings.json: {e}"))?;
    Ok((settings, schema_version_present))
}

fn migrate_add_restart_policy(settings: &mut AppSettings, schema_version_present: bool) -> bool {
    if schema_version_present && settings.schema_version >= SCHEMA_VERSION_ADD_RESTART_POLICY {
        return false;
    }
    settings.restart_backoff_seconds = DEFAULT_RESTART_BACKOFF_SECONDS;
    settings.restart_max_attempts = DEFAULT_RESTART_MAX_ATTEMPTS;
    settings.schema_version = SCHEMA_VERSION_ADD_RESTART_POLICY;
    true
}

fn sanitize_restart_policy(settings: &mut AppSettings) -> bool {
    let mut repaired = false;
    if settings.restart_backoff_seconds == 0
        || settings.restart_backoff_seconds > MAX_RESTART_BACKOFF_SECONDS
    {
        settings.restart_backoff_seconds = DEFAULT_RESTART_BACKOFF_SECONDS;
        repaired = true;
    }
    if settings.restart_max_attempts == 0
        || settings.restart_max_attempts > MAX_RESTART_MAX_ATTEMPTS
    {
        settings.restart_max_attempts = DEFAULT_RESTART_MAX_ATTEMPTS;
        repaired = true;
    }
    if settings.health_probe_delay_seconds > MAX_HEALTH_PROBE_DELAY_SECONDS {
        settings.health_probe_delay_seconds = DEFAULT_HEALTH_PROBE_DELAY_SECONDS;
        repaired = true;
    }
    repaired
}

fn validate(settings: &AppSettings) -> Result<(), String> {
    if settings.backend_port < 1024 {
        return Err("backend_port must be between 1024 and 65535".to_string());
    }
    if settings.log_retention_days == 0 {
        return Err("log_retention_days must be >= 1".to_string());
    }
    if settings.restart_backoff_seconds == 0
        || settings.restart_backoff_seconds > MAX_RESTART_BACKOFF_SECONDS
    {
        return Err(format!(
            "restart_backoff_seconds must be between 1 and {MAX_RESTART_BACKOFF_SECONDS}"
        ));
    }
    if settings.restart_max_attempts == 0 || settings.restart_max_attempts > MAX_RESTART_MAX_ATTEMPTS
    {
        return Err(format!(
            "restart_max_attempts must be between 1 and {MAX_RESTART_MAX_ATTEMPTS}"
        ));
    }
    if settings.health_probe_delay_seconds > MAX_HEALTH_PROBE_DELAY_SECONDS {
        return Err(format!(
            "health_probe_delay_seconds must be <= {MAX_HEALTH_PROBE_DELAY_SECONDS}"
        ));
    }
    Ok(())
}

pub fn read(app: &tauri::AppHandle) -> Result<AppSettings, String> {
    let path = settings_path(app)?;

    if !path.exists() {
        let settings = AppSettings::default();
        // Best-effort: create default settings.json on first read to make the config discoverable/editable.
        let _ = write(app, &settings);
        return Ok(settings);
    }

    let content =
        std::fs::read_to_string(&path).map_err(|e| format!("failed to read settings: {e}"))?;
    let (mut settings, schema_version_present) = parse_settings_json(&content)?;

    let mut repaired = false;
    repaired |= migrate_add_restart_policy(&mut settings, schema_version_present);
    repaired |= sanitize_restart_policy(&mut settings);
    validate(&settings)?;
    if repaired {
        // Best-effort: persist repaired values while keeping read semantics.
        let _ = write(app, &settings);
    }

    Ok(settings)
}

pub fn write(app: &tauri::AppHandle, settings: &AppSettings) -> Result<AppSettings, String> {
    validate(settings)?;

    let path = settings_path(app)?;
    let tmp_path = path.with_file_name("settings.json.tmp");
    let backup_path = path.with_file_name("settings.json.bak");

    let content = serde_json::to_vec_pretty(settings)
        .map_err(|e| format!("failed to serialize settings: {e}"))?;

    std::fs::write(&tmp_path, content)
        .map_err(|e| format!("failed to write temp settings file: {e}"))?;

    if backup_path.exists() {
        let _ = std::fs::remove_file(&backup_path);
    }

    if path.exists() {
        std::fs::rename(&path, &backup_path)
            .map_err(|e| format!("failed to create settings backup: {e}"))?;
    }

    if let Err(e) = std::fs::rename(&tmp_path, &path) {
        let _ = std::fs::rename(&backup_path, &path);
        return Err(format!("failed to finalize settings: {e}"));
    }

    if backup_path.exists() {
        let _ = std::fs::remove_file(&backup_path);
    }

    Ok(settings.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses_to_defaults() {
        let (settings, schema_version_present) = parse_settings_json("{}").expect("parse");
        assert!(!schema_version_present);
        assert_eq!(settings.backend_port, DEFAULT_BACKEND_PORT);
        assert!(settings.backend_autostart);
        assert_eq!(settings.restart_backoff_seconds, DEFAULT_RESTART_BACKOFF_SECONDS);
    }

    #[test]
    fn migration_fills_restart_policy_for_v1_files() {
        let content = r#"{ "schema_version": 1, "backend_port": 9000, "restart_backoff_seconds": 0 }"#;
        let (mut settings, schema_version_present) = parse_settings_json(content).expect("parse");
        assert!(schema_version_present);

        assert!(migrate_add_restart_policy(&mut settings, schema_version_present));
        assert_eq!(settings.schema_version, SCHEMA_VERSION_ADD_RESTART_POLICY);
        assert_eq!(settings.restart_backoff_seconds, DEFAULT_RESTART_BACKOFF_SECONDS);
        assert_eq!(settings.backend_port, 9000);
    }

    #[test]
    fn migration_keeps_current_schema_untouched() {
        let mut settings = AppSettings {
            restart_backoff_seconds: 12,
            ..AppSettings::default()
        };
        assert!(!migrate_add_restart_policy(&mut settings, true));
        assert_eq!(settings.restart_backoff_seconds, 12);
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let mut settings = AppSettings {
            restart_backoff_seconds: 0,
            restart_max_attempts: 1000,
            health_probe_delay_seconds: 600,
            ..AppSettings::default()
        };
        assert!(sanitize_restart_policy(&mut settings));
        assert_eq!(settings.restart_backoff_seconds, DEFAULT_RESTART_BACKOFF_SECONDS);
        assert_eq!(settings.restart_max_attempts, DEFAULT_RESTART_MAX_ATTEMPTS);
        assert_eq!(
            settings.health_probe_delay_seconds,
            DEFAULT_HEALTH_PROBE_DELAY_SECONDS
        );
        assert!(!sanitize_restart_policy(&mut settings));
    }

    #[test]
    fn validate_rejects_privileged_port() {
        let settings = AppSettings {
            backend_port: 80,
            ..AppSettings::default()
        };
        let err = validate(&settings).expect_err("must reject");
        assert!(err.contains("backend_port"), "{err}");
    }
}
