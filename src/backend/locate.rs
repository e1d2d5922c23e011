//! Usage: Locate the backend entry point across ordered candidate locations.

use std::path::PathBuf;
use tauri::Manager;

const BACKEND_PATH_ENV: &str = "DEVICE_CONSOLE_BACKEND_PATH";
const ENTRY_FILE: &str = "main.py";

/// Ordered candidate locations for the backend entry point: explicit override,
/// packaged resources, per-user data dir, then the development checkout layout.
pub(crate) fn candidate_paths(app: &tauri::AppHandle) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(overridden) = std::env::var(BACKEND_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    {
        candidates.push(PathBuf::from(overridden));
    }

    if let Ok(dir) = app.path().resource_dir() {
        candidates.push(dir.join("backend").join(ENTRY_FILE));
    }
    if let Ok(dir) = crate::app_paths::app_data_dir(app) {
        candidates.push(dir.join("backend").join(ENTRY_FILE));
    }
    if let Ok(dir) = std::env::current_dir() {
        candidates.push(dir.join("backend").join(ENTRY_FILE));
        candidates.push(dir.join("..").join("backend").join(ENTRY_FILE));
    }

    candidates
}

/// First existing candidate wins; `None` means the backend is not installed.
pub(crate) fn resolve_entry(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing").join(ENTRY_FILE);
        let first = dir.path().join("first.py");
        let second = dir.path().join("second.py");
        std::fs::write(&first, "print('hi')").expect("write");
        std::fs::write(&second, "print('hi')").expect("write");

        let resolved = resolve_entry(&[missing.clone(), first.clone(), second]);
        assert_eq!(resolved, Some(first));
    }

    #[test]
    fn no_existing_candidate_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let candidates = vec![
            dir.path().join("a").join(ENTRY_FILE),
            dir.path().join("b").join(ENTRY_FILE),
        ];
        assert_eq!(resolve_entry(&candidates), None);
    }

    #[test]
    fn directories_do_not_count_as_entry_points() {
        let dir = tempfile::tempdir().expect("tempdir");
        let as_dir = dir.path().join(ENTRY_FILE);
        std::fs::create_dir_all(&as_dir).expect("mkdir");
        assert_eq!(resolve_entry(&[as_dir]), None);
    }
}
