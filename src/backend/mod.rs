//! Usage: Supervision of the local backend process (locate, validate, run, restart, probe).

pub(crate) mod health;
pub(crate) mod locate;
pub(crate) mod runtime;
pub(crate) mod supervisor;

pub(crate) use supervisor::{BackendStatus, BackendSupervisor, StopMode};
