//! Test utilities shared across crate-level unit tests.

use std::sync::{LazyLock, Mutex, MutexGuard};

static DEFAULT_APP_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Serializes tests that create or delete the `[DEFAULT]` app.
///
/// Tests that only touch uniquely named apps do not need it.
pub(crate) fn default_app_guard() -> MutexGuard<'static, ()> {
    DEFAULT_APP_GUARD
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}
