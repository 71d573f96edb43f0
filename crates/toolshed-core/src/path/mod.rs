//! Path validation for artifact names
//!
//! Artifact names are joined onto the dev root, the cache directory and the
//! repository URL, so they must never climb out of those roots.
//!
//! `Path::is_absolute()` is platform dependent: `/tmp` is absolute on Unix but
//! only *rooted* on Windows. The checks here look at components instead.

use crate::error::{Result, ToolshedError};
use std::path::{Component, Path};

/// Check if path is absolute OR rooted (cross-platform)
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use toolshed_core::path::has_absolute_or_rooted_component;
///
/// assert!(has_absolute_or_rooted_component(Path::new("/etc/passwd")));
/// assert!(!has_absolute_or_rooted_component(Path::new("mysql/defaults.yaml")));
/// ```
pub fn has_absolute_or_rooted_component(path: &Path) -> bool {
    if path.is_absolute() {
        return true;
    }

    path.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

/// Validate a relative artifact name
///
/// Accepts one or more normal components (`pt-query-digest`,
/// `mysql/defaults.yaml`). Rejects empty names, absolute or rooted paths,
/// `.` and `..`.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use toolshed_core::path::validate_relative_name;
///
/// assert!(validate_relative_name(Path::new("pt-query-digest")).is_ok());
/// assert!(validate_relative_name(Path::new("../etc/passwd")).is_err());
/// ```
pub fn validate_relative_name(path: &Path) -> Result<()> {
    let invalid = |reason: &str| ToolshedError::PathInvalid {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if has_absolute_or_rooted_component(path) {
        return Err(invalid("cannot be absolute or rooted"));
    }

    let mut normal_count = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal_count += 1,
            Component::CurDir => return Err(invalid("cannot contain current directory (.)")),
            Component::ParentDir => return Err(invalid("cannot contain parent directory (..)")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("cannot be absolute or rooted"));
            }
        }
    }

    if normal_count == 0 {
        return Err(invalid("cannot be empty"));
    }

    Ok(())
}
