use crate::error::ResolveError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use toolshed_core::path::validate_relative_name;

/// What an artifact is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Configuration file, read by the caller
    Config,
    /// Executable script, made executable after fetch
    Tool,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Config => write!(f, "config"),
            ArtifactKind::Tool => write!(f, "tool"),
        }
    }
}

/// Where a resolved artifact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactOrigin {
    DeveloperOverride,
    FreshCache,
    FetchedRemote,
    StaleCacheFallback,
}

impl fmt::Display for ArtifactOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactOrigin::DeveloperOverride => write!(f, "developer override"),
            ArtifactOrigin::FreshCache => write!(f, "fresh cache"),
            ArtifactOrigin::FetchedRemote => write!(f, "fetched remote"),
            ArtifactOrigin::StaleCacheFallback => write!(f, "stale cache fallback"),
        }
    }
}

/// A single resolution request
///
/// The name is validated on construction, so a request never refers to a
/// path outside the dev root, the cache or the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    name: String,
    kind: ArtifactKind,
}

impl ArtifactRequest {
    pub fn new(name: impl Into<String>, kind: ArtifactKind) -> Result<Self, ResolveError> {
        let name = name.into();
        validate_relative_name(Path::new(&name))
            .map_err(|source| ResolveError::InvalidName { source })?;
        Ok(Self { name, kind })
    }

    pub fn config(name: impl Into<String>) -> Result<Self, ResolveError> {
        Self::new(name, ArtifactKind::Config)
    }

    pub fn tool(name: impl Into<String>) -> Result<Self, ResolveError> {
        Self::new(name, ArtifactKind::Tool)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
}

/// Resolved artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLocation {
    pub path: PathBuf,
    pub origin: ArtifactOrigin,
}
