//! Test utilities for toolshed
//!
//! This crate provides shared testing utilities used across the toolshed workspace.

mod env;
mod logs;
mod net;
mod policy;

pub use env::{ENV_LOCK, with_env_vars};
pub use logs::{CapturedLog, capture_logs};
pub use net::unreachable_url;
pub use policy::StubPolicy;

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// Keeps test files in one gitignored place that is easy to clean up by hand.
/// The directory is removed when the returned `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the current directory is unavailable or `.tmp/` cannot be created.
///
/// # Examples
///
/// ```rust
/// use toolshed_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("defaults.yaml");
/// std::fs::write(&file_path, "v1").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}
