use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use toolshed_core::CachePolicy;
use url::Url;

/// Cache policy with a fixed verdict
///
/// Counts how often it was consulted so tests can assert that a tier was
/// never reached.
#[derive(Debug)]
pub struct StubPolicy {
    tools_dir: PathBuf,
    repository_base: Url,
    needs_update: bool,
    consulted: AtomicUsize,
}

impl StubPolicy {
    pub fn new(tools_dir: impl Into<PathBuf>, repository_base: Url, needs_update: bool) -> Self {
        Self {
            tools_dir: tools_dir.into(),
            repository_base,
            needs_update,
            consulted: AtomicUsize::new(0),
        }
    }

    /// Policy that reports every entry as fresh
    pub fn fresh(tools_dir: impl Into<PathBuf>, repository_base: Url) -> Self {
        Self::new(tools_dir, repository_base, false)
    }

    /// Policy that reports every entry as stale
    pub fn stale(tools_dir: impl Into<PathBuf>, repository_base: Url) -> Self {
        Self::new(tools_dir, repository_base, true)
    }

    /// Number of `should_update` calls so far
    pub fn consulted(&self) -> usize {
        self.consulted.load(Ordering::SeqCst)
    }
}

impl CachePolicy for StubPolicy {
    fn tools_dir(&self) -> &Path {
        &self.tools_dir
    }

    fn should_update(&self, _cache_path: &Path) -> bool {
        self.consulted.fetch_add(1, Ordering::SeqCst);
        self.needs_update
    }

    fn repository_base(&self) -> &Url {
        &self.repository_base
    }
}
