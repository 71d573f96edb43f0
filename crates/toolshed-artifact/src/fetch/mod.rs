//! Remote artifact retrieval
//!
//! This module provides:
//! - HTTP client construction with a user agent and request timeout
//! - Safe URL construction for `<base>/tools/<name>`
//! - Streaming download into a destination via temp file + atomic rename

pub mod client;
pub mod download;
pub mod url;

// Re-exports for convenient access
pub use client::{DEFAULT_TIMEOUT, USER_AGENT, build_client};
pub use download::{Fetcher, NoProgress, Progress};
pub use url::{UrlError, artifact_url, join_segments};
