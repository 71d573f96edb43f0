//! HTTP client construction for artifact fetches

use reqwest::blocking::Client;
use std::time::Duration;

/// Default timeout for fetch requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("toolshed/", env!("CARGO_PKG_VERSION"));

/// Builds HTTP client bounded by `timeout`
///
/// The timeout covers the whole request including the body, so a stalled
/// download fails instead of hanging the resolution.
///
/// # Errors
///
/// Returns error if client construction fails
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}
