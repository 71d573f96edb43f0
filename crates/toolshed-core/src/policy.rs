//! Cache freshness policy
//!
//! The resolver never decides freshness on its own. It asks a [`CachePolicy`],
//! which also tells it where the cache lives and where remote copies come from.

use crate::config::Config;
use crate::error::Result;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use url::Url;

/// Capabilities the resolver consumes
pub trait CachePolicy {
    /// Base directory for cached artifacts
    fn tools_dir(&self) -> &Path;

    /// Whether `cache_path` must be refreshed before use
    ///
    /// Must return `true` for a path that does not exist.
    fn should_update(&self, cache_path: &Path) -> bool;

    /// Remote root used to build fetch URLs
    fn repository_base(&self) -> &Url;
}

impl<P: CachePolicy + ?Sized> CachePolicy for &P {
    fn tools_dir(&self) -> &Path {
        (**self).tools_dir()
    }

    fn should_update(&self, cache_path: &Path) -> bool {
        (**self).should_update(cache_path)
    }

    fn repository_base(&self) -> &Url {
        (**self).repository_base()
    }
}

/// Age-based policy: an entry is stale once its mtime is older than `ttl`
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    tools_dir: PathBuf,
    repository_base: Url,
    ttl: Duration,
}

impl TtlPolicy {
    pub fn new(tools_dir: impl Into<PathBuf>, repository_base: Url, ttl: Duration) -> Self {
        Self {
            tools_dir: tools_dir.into(),
            repository_base,
            ttl,
        }
    }

    /// Build from loaded configuration
    ///
    /// Fails when no repository base is configured or no cache dir can be found.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.tools_dir()?,
            config.repository_base()?.clone(),
            config.ttl(),
        ))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Whether the file at `path` is older than `ttl`
///
/// A missing file or an unreadable mtime counts as expired, as does any file
/// when `ttl` is zero. An mtime in the future means clock skew and counts as
/// fresh.
pub fn is_expired(path: &Path, ttl: Duration) -> bool {
    let modified = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(e) => {
            debug!("{}: no usable mtime ({}), needs update", path.display(), e);
            return true;
        }
    };

    if ttl.is_zero() {
        return true;
    }

    match SystemTime::now().duration_since(modified) {
        Ok(age) => age > ttl,
        Err(_) => false,
    }
}

impl CachePolicy for TtlPolicy {
    fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    fn should_update(&self, cache_path: &Path) -> bool {
        is_expired(cache_path, self.ttl)
    }

    fn repository_base(&self) -> &Url {
        &self.repository_base
    }
}
