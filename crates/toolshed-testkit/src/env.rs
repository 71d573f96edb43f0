//! Environment isolation for tests that read `TOOLSHED_*` variables

use std::sync::Mutex;

/// Serializes tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with `vars` set (`Some`) or removed (`None`), then restores them
///
/// Holds [`ENV_LOCK`] for the duration, recovering it if a previous test
/// panicked while holding it.
///
/// # Examples
///
/// ```rust
/// use toolshed_testkit::with_env_vars;
///
/// let seen = with_env_vars(&[("TOOLSHED_DEV_ROOT", Some("/src/tools"))], || {
///     std::env::var("TOOLSHED_DEV_ROOT").ok()
/// });
/// assert_eq!(seen.as_deref(), Some("/src/tools"));
/// ```
pub fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let originals: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();

    // SAFETY: ENV_LOCK is held, so no other test mutates the environment concurrently
    unsafe {
        for (key, value) in vars {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }

    let result = f();

    // SAFETY: still holding ENV_LOCK
    unsafe {
        for (key, original) in originals {
            match original {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }

    result
}
