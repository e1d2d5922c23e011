//! Usage: User-visible notices relayed to the frontend as events; the webview
//! turns them into system notifications.

use tauri::Emitter;

pub(crate) const NOTICE_EVENT: &str = "notice:notify";

const TITLE_PREFIX: &str = "Device Console";

#[derive(Debug, Clone, Copy, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    fn default_title(self) -> &'static str {
        match self {
            Self::Info => "提示",
            Self::Success => "成功",
            Self::Warning => "提醒",
            Self::Error => "错误",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notice {
    /// Blank or missing titles fall back to the level's default.
    pub(crate) fn new(level: NoticeLevel, title: Option<String>, body: impl Into<String>) -> Self {
        let title = title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| level.default_title());
        Self {
            level,
            title: format!("{TITLE_PREFIX} · {title}"),
            body: body.into(),
        }
    }

    /// Supervisor failures all surface under one error-level title.
    pub(crate) fn backend_fault(body: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, Some("后端服务".to_string()), body)
    }
}

pub(crate) fn emit(app: &tauri::AppHandle, notice: Notice) -> Result<(), String> {
    app.emit(NOTICE_EVENT, notice)
        .map_err(|e| format!("NOTICE_EMIT: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_fall_back_to_the_level_default() {
        let notice = Notice::new(NoticeLevel::Error, Some("   ".to_string()), "boom");
        assert_eq!(notice.title, "Device Console · 错误");

        let notice = Notice::new(NoticeLevel::Info, Some("后端".to_string()), "ok");
        assert_eq!(notice.title, "Device Console · 后端");

        let notice = Notice::new(NoticeLevel::Warning, None, "careful");
        assert_eq!(notice.title, "Device Console · 提醒");
    }

    #[test]
    fn backend_faults_are_error_level() {
        let notice = Notice::backend_fault("进程连续崩溃");
        assert!(matches!(notice.level, NoticeLevel::Error));
        assert_eq!(notice.title, "Device Console · 后端服务");
        assert_eq!(notice.body, "进程连续崩溃");
    }
}
