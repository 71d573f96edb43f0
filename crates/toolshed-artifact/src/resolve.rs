use crate::error::{FetchError, ResolveError};
use crate::fetch::{Fetcher, NoProgress, Progress, artifact_url};
use crate::info::{ArtifactKind, ArtifactLocation, ArtifactOrigin, ArtifactRequest};
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use toolshed_core::{CachePolicy, Config, NetworkPolicy, TtlPolicy};

/// Resolves artifact names to local paths
///
/// Resolution priority:
/// 1. Developer override `<dev_root>/<name>` (if a dev root is set)
/// 2. Cache `<tools_dir>/<name>` when the policy says it is fresh
/// 3. Remote `<repository_base>/tools/<name>`, fetched into the cache
/// 4. Stale cache, when the fetch fails and a previous copy exists
pub struct Resolver<P> {
    policy: P,
    fetcher: Fetcher,
    dev_root: Option<PathBuf>,
    network: NetworkPolicy,
    progress: Box<dyn Progress + Send + Sync>,
}

impl Resolver<TtlPolicy> {
    /// Resolver wired from configuration: TTL policy, dev root, network policy
    /// and request timeout
    pub fn from_config(config: &Config) -> Result<Self, ResolveError> {
        let policy = TtlPolicy::from_config(config)?;
        let fetcher = Fetcher::new(config.timeout()).map_err(ResolveError::Client)?;

        let mut resolver = Self::with_fetcher(policy, fetcher).network_policy(config.network.policy);
        if let Some(root) = &config.dev.root {
            resolver = resolver.dev_root(root);
        }
        Ok(resolver)
    }
}

impl<P: CachePolicy> Resolver<P> {
    /// Resolver with a default-timeout fetcher and no dev root
    pub fn new(policy: P) -> Result<Self, ResolveError> {
        let fetcher = Fetcher::with_default_timeout().map_err(ResolveError::Client)?;
        Ok(Self::with_fetcher(policy, fetcher))
    }

    pub fn with_fetcher(policy: P, fetcher: Fetcher) -> Self {
        Self {
            policy,
            fetcher,
            dev_root: None,
            network: NetworkPolicy::Auto,
            progress: Box::new(NoProgress),
        }
    }

    /// Directory whose files shadow cache and remote
    pub fn dev_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.dev_root = Some(root.into());
        self
    }

    pub fn network_policy(mut self, network: NetworkPolicy) -> Self {
        self.network = network;
        self
    }

    pub fn progress(mut self, progress: impl Progress + Send + Sync + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Cache location for `request`, whether or not it exists
    pub fn cache_path(&self, request: &ArtifactRequest) -> PathBuf {
        self.policy.tools_dir().join(request.name())
    }

    /// Validates `name` and resolves it
    pub fn resolve_artifact(
        &self,
        name: &str,
        kind: ArtifactKind,
    ) -> Result<ArtifactLocation, ResolveError> {
        self.resolve(&ArtifactRequest::new(name, kind)?)
    }

    /// Resolves `request` to a usable path
    ///
    /// Performs at most one fetch. A failed fetch, including one that could
    /// not start because no URL can be built for the name, falls back to an
    /// existing cache entry (logged as a warning) and only errors when there
    /// is none.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Inspect`] if an override or cache path cannot be
    ///   inspected for a reason other than not existing
    /// - [`ResolveError::Url`] if no fetch URL can be built and nothing is cached
    /// - [`ResolveError::Unavailable`] if the fetch fails with nothing cached
    /// - [`ResolveError::Offline`] if the network is disabled with nothing cached
    pub fn resolve(&self, request: &ArtifactRequest) -> Result<ArtifactLocation, ResolveError> {
        let name = request.name();

        if let Some(dev_root) = &self.dev_root {
            let override_path = dev_root.join(name);
            if exists(&override_path)? {
                debug!("{}: using developer override {}", name, override_path.display());
                return Ok(ArtifactLocation {
                    path: override_path,
                    origin: ArtifactOrigin::DeveloperOverride,
                });
            }
        }

        let cache_path = self.cache_path(request);
        if !self.policy.should_update(&cache_path) {
            debug!("{}: cache is fresh at {}", name, cache_path.display());
            return Ok(ArtifactLocation {
                path: cache_path,
                origin: ArtifactOrigin::FreshCache,
            });
        }

        if self.network == NetworkPolicy::Never {
            return if exists(&cache_path)? {
                warn!(
                    "{}: network disabled, using cached copy without refresh: {}",
                    name,
                    cache_path.display()
                );
                Ok(ArtifactLocation {
                    path: cache_path,
                    origin: ArtifactOrigin::StaleCacheFallback,
                })
            } else {
                Err(ResolveError::Offline {
                    name: name.to_string(),
                })
            };
        }

        match self.fetch_into_cache(request, &cache_path) {
            Ok(()) => Ok(ArtifactLocation {
                path: cache_path,
                origin: ArtifactOrigin::FetchedRemote,
            }),
            Err(outcome) => {
                if exists(&cache_path)? {
                    warn!(
                        "{}: refresh failed ({}), using stale cache {}",
                        name,
                        outcome,
                        cache_path.display()
                    );
                    Ok(ArtifactLocation {
                        path: cache_path,
                        origin: ArtifactOrigin::StaleCacheFallback,
                    })
                } else {
                    Err(outcome.into_error(name))
                }
            }
        }
    }

    fn fetch_into_cache(
        &self,
        request: &ArtifactRequest,
        cache_path: &Path,
    ) -> Result<(), FetchOutcome> {
        let base = self.policy.repository_base();
        let url = artifact_url(base, request.name()).map_err(|e| {
            FetchOutcome::Setup(ResolveError::Url {
                name: request.name().to_string(),
                base: base.clone(),
                reason: e.to_string(),
            })
        })?;

        // Tools are renamed into place already executable
        let mode = match request.kind() {
            ArtifactKind::Tool => Some(TOOL_MODE),
            ArtifactKind::Config => None,
        };

        let bytes = self
            .fetcher
            .fetch_with_mode(&url, cache_path, mode, self.progress.as_ref())
            .map_err(FetchOutcome::Failed)?;

        info!(
            "fetched {} ({} bytes) into {}",
            request.name(),
            bytes,
            cache_path.display()
        );
        Ok(())
    }
}

/// rwxr-xr-x
const TOOL_MODE: u32 = 0o755;

/// Why a fetch step did not produce a cache entry
enum FetchOutcome {
    /// Could not attempt the fetch
    Setup(ResolveError),
    /// The attempt failed
    Failed(FetchError),
}

impl FetchOutcome {
    /// Error reported when no cached copy can stand in
    fn into_error(self, name: &str) -> ResolveError {
        match self {
            FetchOutcome::Setup(err) => err,
            FetchOutcome::Failed(source) => ResolveError::Unavailable {
                name: name.to_string(),
                source,
            },
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Setup(err) => err.fmt(f),
            FetchOutcome::Failed(err) => err.fmt(f),
        }
    }
}

/// Classified existence check
///
/// Only "not found" (including a non-directory in the middle of the path)
/// counts as absent. Anything else, such as permission denied, is an error.
fn exists(path: &Path) -> Result<bool, ResolveError> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(source) => Err(ResolveError::Inspect {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::time::Duration;
    use toolshed_testkit::{StubPolicy, temp_dir_in_workspace, unreachable_url};
    use url::Url;

    fn resolver(policy: StubPolicy) -> Resolver<StubPolicy> {
        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        Resolver::with_fetcher(policy, fetcher)
    }

    #[test]
    fn test_exists_classifies_not_found() {
        let temp = temp_dir_in_workspace();
        assert!(!exists(&temp.path().join("absent")).unwrap());

        let file = temp.path().join("present");
        fs::write(&file, "x").unwrap();
        assert!(exists(&file).unwrap());
    }

    #[test]
    fn test_exists_treats_file_in_path_as_absent() {
        let temp = temp_dir_in_workspace();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(!exists(&file.join("child")).unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn test_exists_propagates_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let temp = temp_dir_in_workspace();
        let locked = temp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("inner"), "x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root bypasses directory permissions
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = exists(&locked.join("inner"));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(matches!(result, Err(ResolveError::Inspect { .. })));
    }

    #[test]
    fn test_cache_path_joins_tools_dir() {
        let temp = temp_dir_in_workspace();
        let policy = StubPolicy::fresh(temp.path(), Url::parse("https://h/").unwrap());
        let resolver = resolver(policy);
        let request = ArtifactRequest::config("mysql/defaults.yaml").unwrap();

        assert_eq!(
            resolver.cache_path(&request),
            temp.path().join("mysql/defaults.yaml")
        );
    }

    #[test]
    fn test_invalid_name_rejected_before_any_io() {
        let temp = temp_dir_in_workspace();
        let policy = StubPolicy::stale(temp.path(), unreachable_url());
        let err = resolver(policy)
            .resolve_artifact("../escape", ArtifactKind::Config)
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidName { .. }));
    }

    #[test]
    fn test_config_kind_is_not_made_executable() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/tools/defaults.yaml")
            .with_status(200)
            .with_body("v2")
            .create();

        let temp = temp_dir_in_workspace();
        let policy = StubPolicy::stale(temp.path(), Url::parse(&server.url()).unwrap());
        let location = resolver(policy)
            .resolve_artifact("defaults.yaml", ArtifactKind::Config)
            .unwrap();

        assert_eq!(location.origin, ArtifactOrigin::FetchedRemote);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&location.path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0, "config should not be executable: {:o}", mode);
        }
    }

    #[test]
    fn test_stale_cache_keeps_existing_permissions() {
        let temp = temp_dir_in_workspace();
        let cache = temp.path().join("pt-query-digest");
        fs::write(&cache, "#!/bin/sh\n").unwrap();

        let policy = StubPolicy::stale(temp.path(), unreachable_url());
        let location = resolver(policy)
            .resolve_artifact("pt-query-digest", ArtifactKind::Tool)
            .unwrap();

        assert_eq!(location.origin, ArtifactOrigin::StaleCacheFallback);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&cache).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0, "fallback must not touch permissions");
        }
    }

    #[test]
    fn test_borrowed_policy_stays_inspectable() {
        let temp = temp_dir_in_workspace();
        fs::write(temp.path().join("defaults.yaml"), "v1").unwrap();

        let policy = StubPolicy::fresh(temp.path(), unreachable_url());
        let fetcher = Fetcher::new(Duration::from_secs(5)).unwrap();
        let resolver = Resolver::with_fetcher(&policy, fetcher);

        let location = resolver
            .resolve_artifact("defaults.yaml", ArtifactKind::Config)
            .unwrap();

        assert_eq!(location.origin, ArtifactOrigin::FreshCache);
        assert_eq!(policy.consulted(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_dev_root_is_inspect_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = temp_dir_in_workspace();
        let dev_root = temp.path().join("dev");
        fs::create_dir(&dev_root).unwrap();
        fs::write(dev_root.join("pt-query-digest"), "#!/bin/sh\n").unwrap();
        fs::set_permissions(&dev_root, fs::Permissions::from_mode(0o000)).unwrap();

        // root bypasses directory permissions
        if fs::read_dir(&dev_root).is_ok() {
            fs::set_permissions(&dev_root, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let policy = StubPolicy::stale(temp.path().join("cache"), unreachable_url());
        let result = resolver(policy)
            .dev_root(&dev_root)
            .resolve_artifact("pt-query-digest", ArtifactKind::Tool);

        fs::set_permissions(&dev_root, fs::Permissions::from_mode(0o755)).unwrap();
        match result {
            Err(ResolveError::Inspect { path, .. }) => {
                assert_eq!(path, dev_root.join("pt-query-digest"));
            }
            Err(other) => panic!("expected inspect error, got {:?}", other),
            Ok(location) => panic!("expected inspect error, got {:?}", location),
        }
        assert!(!temp.path().join("cache").exists());
    }

    #[test]
    fn test_unbuildable_url_falls_back_to_stale_cache() {
        let temp = temp_dir_in_workspace();
        fs::write(temp.path().join("defaults.yaml"), "v1").unwrap();

        let base = Url::parse("mailto:ops@example.com").unwrap();
        let policy = StubPolicy::stale(temp.path(), base);
        let location = resolver(policy)
            .resolve_artifact("defaults.yaml", ArtifactKind::Config)
            .unwrap();

        assert_eq!(location.origin, ArtifactOrigin::StaleCacheFallback);
        assert_eq!(fs::read_to_string(&location.path).unwrap(), "v1");
    }

    #[test]
    fn test_unbuildable_url_without_cache_is_url_error() {
        let temp = temp_dir_in_workspace();
        let base = Url::parse("mailto:ops@example.com").unwrap();
        let policy = StubPolicy::stale(temp.path(), base);

        let err = resolver(policy)
            .resolve_artifact("defaults.yaml", ArtifactKind::Config)
            .unwrap_err();

        assert!(matches!(err, ResolveError::Url { .. }), "got {:?}", err);
    }
}
