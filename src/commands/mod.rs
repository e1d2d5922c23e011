//! Usage: Tauri command surface presented to the UI (input validation + uniform results).

mod app;
mod audio;
mod backend;
mod network;
mod power;
mod settings;

pub(crate) use app::*;
pub(crate) use audio::*;
pub(crate) use backend::*;
pub(crate) use network::*;
pub(crate) use power::*;
pub(crate) use settings::*;

use crate::domain::intent::Intent;
use crate::domain::parse;
use crate::domain::platform::Platform;
use crate::domain::resolver;
use crate::domain::result::ControlResult;
use crate::executor;

/// Resolve → execute → parse, folding every failure into the result envelope.
pub(in crate::commands) async fn dispatch(intent: &Intent) -> ControlResult {
    let command = match resolver::resolve(intent, Platform::current()) {
        Ok(command) => command,
        Err(err) => return ControlResult::fail(err),
    };

    let combined =
        match executor::run_steps(&command.steps, executor::DEFAULT_CONTROL_TIMEOUT).await {
            Ok(combined) => combined,
            Err(err) => {
                tracing::warn!(intent = intent.name(), "系统控制命令执行失败: {}", err);
                return ControlResult::fail(err);
            }
        };

    match parse::parse_payload(command.parser, &combined) {
        Ok(payload) => ControlResult {
            success: true,
            payload,
            error: None,
        },
        Err(err) => ControlResult::fail(err),
    }
}
