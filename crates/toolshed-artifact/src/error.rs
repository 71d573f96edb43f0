//! Error types for fetching and resolving artifacts

use std::path::PathBuf;
use thiserror::Error;
use toolshed_core::ToolshedError;
use url::Url;

/// Fetch failures
///
/// Every variant is raised before the destination is replaced, so a failed
/// fetch never alters an existing cache entry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Parent directory of the destination could not be created
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temporary destination file could not be created
    #[error("failed to create download file in {}: {source}", dir.display())]
    CreateDestination {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection, DNS or timeout failure
    #[error("network error fetching {url}: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} returned {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },

    /// Body copy interrupted
    #[error("failed while {operation}: {source}")]
    Stream {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Body shorter or longer than the declared content length
    #[error("body size mismatch: expected {expected} bytes, got {actual} bytes")]
    Truncated { expected: u64, actual: u64 },

    /// Final rename over the destination failed
    #[error("failed to move download into {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolution failures
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid artifact name: {source}")]
    InvalidName {
        #[source]
        source: ToolshedError,
    },

    /// Stat failed for a reason other than "not found"
    #[error("cannot inspect {}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot build URL for '{name}' from {base}: {reason}")]
    Url {
        name: String,
        base: Url,
        reason: String,
    },

    #[error(transparent)]
    Config(#[from] ToolshedError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Fetch failed and nothing was cached to fall back on
    #[error("'{name}' could not be fetched and no cached copy exists: {source}")]
    Unavailable {
        name: String,
        #[source]
        source: FetchError,
    },

    /// Network disabled by policy and nothing cached
    #[error("'{name}' is not cached and network access is disabled (network.policy = \"never\")")]
    Offline { name: String },
}

/// Tool execution failures
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read interpreter line of {}: {source}", path.display())]
    Interpreter {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
