//! Usage: Poison-recovering lock helper for std mutexes guarding managed state.

use std::sync::{Mutex, MutexGuard};

pub(crate) trait MutexExt<T> {
    fn lock_or_recover(&self) -> MutexGuard<'_, T>;
}

impl<T> MutexExt<T> for Mutex<T> {
    fn lock_or_recover(&self) -> MutexGuard<'_, T> {
        match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("互斥锁中毒，恢复后继续使用");
                poisoned.into_inner()
            }
        }
    }
}
