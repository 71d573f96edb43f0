//! Artifact resolution for toolshed.
//!
//! Resolves a named artifact (a configuration file or an executable tool
//! script) to a local path, choosing between a developer override, the local
//! cache and a freshly fetched remote copy.
//!
//! # Modules
//!
//! - [`info`]: request and location types
//! - [`fetch`]: HTTP client, URL helpers and the streaming [`Fetcher`]
//! - [`resolve`]: the [`Resolver`] and its precedence rules
//! - [`exec`]: running resolved tools
//!
//! # Resolution Flow
//!
//! ```text
//! Resolver::resolve(request)
//!     ↓
//! 1. <dev_root>/<name> exists?          → DeveloperOverride
//!     ↓ (not found)
//! 2. policy.should_update(cache) false? → FreshCache
//!     ↓ (stale or absent)
//! 3. GET <base>/tools/<name> → temp file → rename over cache
//!     → ok                              → FetchedRemote (+x for tools)
//!     ↓ (failed)
//! 4. cache exists?                      → StaleCacheFallback (warning)
//!     ↓ (no)
//! 5. ResolveError::Unavailable
//! ```
//!
//! # Example
//!
//! ```no_run
//! use toolshed_artifact::{ArtifactKind, Resolver};
//! use toolshed_core::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! let resolver = Resolver::from_config(&config)?;
//!
//! let location = resolver.resolve_artifact("pt-query-digest", ArtifactKind::Tool)?;
//! println!("{} ({})", location.path.display(), location.origin);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod exec;
pub mod fetch;
pub mod info;
pub mod resolve;

// Re-export commonly used types
pub use error::{ExecError, FetchError, ResolveError};
pub use exec::run_tool;
pub use fetch::{Fetcher, NoProgress, Progress};
pub use info::{ArtifactKind, ArtifactLocation, ArtifactOrigin, ArtifactRequest};
pub use resolve::Resolver;
