//! Scoped `GROPIUS__*` environment for settings tests.

use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Every variable the settings loader reads.
pub const SETTINGS_VARS: [&str; 6] = [
    "GROPIUS__DATABASE__URL",
    "GROPIUS__DATABASE__MAX_CONNECTIONS",
    "GROPIUS__AUTH__SECRET",
    "GROPIUS__AUTH__ISSUER",
    "GROPIUS__AUTH__AUDIENCE",
    "GROPIUS__AUTH__TOKEN_LIFETIME_HOURS",
];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Holds the process environment with exactly the given settings variables
/// set, restoring the previous values on drop.
pub struct SettingsEnv {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl SettingsEnv {
    /// Clears every settings variable, then applies `values`.
    pub fn with(values: &[(&str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = SETTINGS_VARS
            .iter()
            .map(|&key| (key, env::var(key).ok()))
            .collect();

        for key in SETTINGS_VARS {
            let value = values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|&(_, configured)| configured);
            // SAFETY: `ENV_LOCK` serializes environment mutation across tests.
            unsafe { apply(key, value) };
        }

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for SettingsEnv {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: the lock is still held until this guard finishes dropping.
            unsafe { apply(key, value.as_deref()) };
        }
    }
}

/// Sets or removes one variable.
///
/// # Safety
///
/// The caller must hold `ENV_LOCK`.
unsafe fn apply(key: &str, value: Option<&str>) {
    unsafe {
        match value {
            Some(set) => env::set_var(key, set),
            None => env::remove_var(key),
        }
    }
}
