//! Configuration model and loading
//!
//! Values come from a TOML file and may be overridden by `TOOLSHED_*`
//! environment variables. See [`Config::load`].

mod model;

pub use model::{
    CacheConfig, Config, DevConfig, NetworkConfig, NetworkPolicy, RepositoryConfig,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TTL_SECS,
};

/// Explicit configuration file location
pub const CONFIG_ENV: &str = "TOOLSHED_CONFIG";
/// Overrides `repository.base`
pub const REPOSITORY_ENV: &str = "TOOLSHED_REPOSITORY";
/// Overrides `cache.dir`
pub const CACHE_DIR_ENV: &str = "TOOLSHED_CACHE_DIR";
/// Overrides `dev.root`
pub const DEV_ROOT_ENV: &str = "TOOLSHED_DEV_ROOT";
