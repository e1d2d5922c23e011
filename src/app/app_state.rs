//! Usage: Shared Tauri state types used by `commands/*`.

use crate::backend::BackendSupervisor;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct BackendState(pub(crate) Mutex<BackendSupervisor>);
