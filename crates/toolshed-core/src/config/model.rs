use super::{CACHE_DIR_ENV, CONFIG_ENV, DEV_ROOT_ENV, REPOSITORY_ENV};
use crate::error::{Result, ToolshedError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default freshness window for cached artifacts (one day)
pub const DEFAULT_TTL_SECS: u64 = 86_400;

/// Default request timeout for fetches
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// toolshed config.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub dev: DevConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Remote root; artifacts live under `<base>/tools/<name>`
    #[serde(default)]
    pub base: Option<Url>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_network_policy")]
    pub policy: NetworkPolicy,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            policy: NetworkPolicy::Auto,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPolicy {
    Auto,
    Never,
}

fn default_network_policy() -> NetworkPolicy {
    NetworkPolicy::Auto
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevConfig {
    /// Local checkout whose files shadow cache and remote
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl Config {
    /// Read a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolshedError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ToolshedError::ConfigParseError(format!("{}: {}", path.display(), e))
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ToolshedError::ConfigParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the effective configuration
    ///
    /// Lookup order for the file:
    /// 1. `explicit` (must exist)
    /// 2. `$TOOLSHED_CONFIG` (must exist)
    /// 3. `<config_dir>/toolshed/config.toml` (optional)
    ///
    /// `TOOLSHED_*` environment variables are applied on top.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(path)?,
                _ => {
                    debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Default config file location
    ///
    /// - Linux: ~/.config/toolshed/config.toml
    /// - macOS: ~/Library/Application Support/toolshed/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("toolshed").join("config.toml"))
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(REPOSITORY_ENV).filter(|v| !v.is_empty()) {
            let url = Url::parse(&base).map_err(|e| ToolshedError::ConfigInvalidValue {
                field: REPOSITORY_ENV.to_string(),
                reason: e.to_string(),
            })?;
            self.repository.base = Some(url);
        }

        if let Some(dir) = lookup(CACHE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.cache.dir = Some(PathBuf::from(dir));
        }

        if let Some(root) = lookup(DEV_ROOT_ENV).filter(|v| !v.is_empty()) {
            self.dev.root = Some(PathBuf::from(root));
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.network.timeout_secs == 0 {
            return Err(ToolshedError::ConfigInvalidValue {
                field: "network.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if let Some(base) = &self.repository.base
            && base.cannot_be_a_base()
        {
            return Err(ToolshedError::ConfigInvalidValue {
                field: "repository.base".to_string(),
                reason: format!("'{}' cannot be used as a base URL", base),
            });
        }

        Ok(())
    }

    /// Remote root, required for any fetch
    pub fn repository_base(&self) -> Result<&Url> {
        self.repository
            .base
            .as_ref()
            .ok_or_else(|| ToolshedError::ConfigInvalidValue {
                field: "repository.base".to_string(),
                reason: format!("not set (use config.toml or {})", REPOSITORY_ENV),
            })
    }

    /// Directory holding cached artifacts
    ///
    /// Falls back to the platform cache dir:
    /// - Linux: ~/.cache/toolshed/tools
    /// - macOS: ~/Library/Caches/toolshed/tools
    pub fn tools_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache.dir {
            return Ok(dir.clone());
        }

        let base = dirs::cache_dir().ok_or(ToolshedError::NoCacheDir)?;
        Ok(base.join("toolshed").join("tools"))
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[repository]
base = "https://tools.example.com/toolshed/"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(
            config.repository_base().unwrap().as_str(),
            "https://tools.example.com/toolshed/"
        );
        assert_eq!(config.cache.ttl_secs, DEFAULT_TTL_SECS);
        assert_eq!(config.network.policy, NetworkPolicy::Auto);
        assert_eq!(config.network.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.dev.root.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[repository]
base = "https://tools.example.com/"

[cache]
dir = "/var/cache/toolshed"
ttl_secs = 60

[network]
policy = "never"
timeout_secs = 5

[dev]
root = "/home/dev/toolshed"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(
            config.tools_dir().unwrap(),
            PathBuf::from("/var/cache/toolshed")
        );
        assert_eq!(config.ttl(), Duration::from_secs(60));
        assert_eq!(config.network.policy, NetworkPolicy::Never);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.dev.root, Some(PathBuf::from("/home/dev/toolshed")));
    }

    #[test]
    fn test_empty_config_has_no_repository() {
        let config = Config::from_toml("").unwrap();
        let err = config.repository_base().unwrap_err();
        assert!(err.to_string().contains("repository.base"));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = Config::from_toml("[cache\nttl_secs = 1").unwrap_err();
        assert!(matches!(err, ToolshedError::ConfigParseError(_)));
    }

    #[test]
    fn test_invalid_network_policy_rejected() {
        let err = Config::from_toml("[network]\npolicy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ToolshedError::ConfigParseError(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_toml("[network]\ntimeout_secs = 0").unwrap_err();
        assert!(matches!(
            err,
            ToolshedError::ConfigInvalidValue { ref field, .. } if field == "network.timeout_secs"
        ));
    }

    #[test]
    fn test_non_base_url_rejected() {
        let err = Config::from_toml("[repository]\nbase = \"mailto:ops@example.com\"").unwrap_err();
        assert!(matches!(
            err,
            ToolshedError::ConfigInvalidValue { ref field, .. } if field == "repository.base"
        ));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::from_toml(
            r#"
[repository]
base = "https://file.example.com/"

[cache]
dir = "/from/file"
"#,
        )
        .unwrap();

        config
            .apply_overrides(lookup_from(&[
                (REPOSITORY_ENV, "https://env.example.com/base/"),
                (CACHE_DIR_ENV, "/from/env"),
                (DEV_ROOT_ENV, "/dev/root"),
            ]))
            .unwrap();

        assert_eq!(
            config.repository_base().unwrap().as_str(),
            "https://env.example.com/base/"
        );
        assert_eq!(config.tools_dir().unwrap(), PathBuf::from("/from/env"));
        assert_eq!(config.dev.root, Some(PathBuf::from("/dev/root")));
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[(REPOSITORY_ENV, ""), (CACHE_DIR_ENV, "")]))
            .unwrap();
        assert!(config.repository.base.is_none());
        assert!(config.cache.dir.is_none());
    }

    #[test]
    fn test_invalid_repository_env_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup_from(&[(REPOSITORY_ENV, "not a url")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ToolshedError::ConfigInvalidValue { ref field, .. } if field == REPOSITORY_ENV
        ));
    }

    #[test]
    fn test_from_file_missing_is_not_found() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = Config::from_file(temp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ToolshedError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_from_file_reads_content() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[cache]\nttl_secs = 10\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.cache.ttl_secs, 10);
    }

    #[test]
    fn test_default_tools_dir_under_platform_cache() {
        let config = Config::default();
        if let Ok(dir) = config.tools_dir() {
            assert!(dir.ends_with("toolshed/tools") || dir.ends_with("toolshed\\tools"));
        }
    }
}
