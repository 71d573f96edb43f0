//! Streaming download into a cache path
//!
//! The body is written to a uniquely named temporary file next to the
//! destination and renamed over it only after the whole body arrived. Until
//! then the destination, if any, is left untouched, and concurrent fetches of
//! the same artifact never interleave: each writes its own temp file and the
//! last rename wins with a complete copy.

use crate::error::FetchError;
use crate::fetch::client::{DEFAULT_TIMEOUT, build_client};
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use url::Url;

const CHUNK_SIZE: usize = 8192;

/// Receives transfer progress while a body is copied
///
/// All methods default to no-ops.
pub trait Progress {
    /// Transfer started; `total` is the declared content length, if any
    fn begin(&self, _total: Option<u64>) {}

    /// `downloaded` bytes written so far
    fn advance(&self, _downloaded: u64) {}

    /// Transfer ended, successfully or not
    fn finish(&self) {}
}

/// Progress sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// One-shot artifact downloader
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Fetcher whose requests are bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_client(timeout)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetcher with [`DEFAULT_TIMEOUT`]
    pub fn with_default_timeout() -> Result<Self, reqwest::Error> {
        Self::new(DEFAULT_TIMEOUT)
    }

    /// Downloads `url` into `destination`
    ///
    /// Creates missing parent directories. Only a `200 OK` response whose body
    /// is copied completely replaces `destination`. Returns the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// - [`FetchError::CreateDirectory`] if the parent directory cannot be created
    /// - [`FetchError::Network`] on connection, DNS or timeout failure
    /// - [`FetchError::Status`] for any status other than 200
    /// - [`FetchError::CreateDestination`] if the temp file cannot be created
    /// - [`FetchError::Stream`] / [`FetchError::Truncated`] if the body copy fails
    /// - [`FetchError::Persist`] if the final rename fails
    pub fn fetch(
        &self,
        url: &Url,
        destination: &Path,
        progress: &dyn Progress,
    ) -> Result<u64, FetchError> {
        self.fetch_with_mode(url, destination, None, progress)
    }

    /// Like [`Fetcher::fetch`], but gives the file unix permission bits
    /// `mode` before it is renamed into place
    ///
    /// The new entry appears at `destination` with its final mode. Failing to
    /// set the mode is logged and the file is installed with the default mode.
    /// `mode` is ignored on non-unix platforms.
    pub fn fetch_with_mode(
        &self,
        url: &Url,
        destination: &Path,
        mode: Option<u32>,
        progress: &dyn Progress,
    ) -> Result<u64, FetchError> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(dir).map_err(|e| FetchError::CreateDirectory {
            path: dir.to_path_buf(),
            source: e,
        })?;

        debug!("GET {}", url);
        let mut response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|e| FetchError::Network {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        let mut temp_file = create_temp_in(dir, destination)?;

        let total = response.content_length();
        progress.begin(total);
        let copied = copy_body(&mut response, &mut temp_file, total, progress);
        progress.finish();
        let downloaded = copied?;

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| FetchError::Stream {
                operation: "syncing download file".to_string(),
                source: e,
            })?;

        if let Some(mode) = mode
            && let Err(e) = set_mode(temp_file.path(), mode)
        {
            warn!(
                "could not set mode {:o} on {}: {}",
                mode,
                destination.display(),
                e
            );
        }

        // Atomic rename within the same directory, replaces any existing entry
        temp_file
            .persist(destination)
            .map_err(|e| FetchError::Persist {
                path: destination.to_path_buf(),
                source: e.error,
            })?;

        debug!("wrote {} bytes to {}", downloaded, destination.display());
        Ok(downloaded)
    }
}

/// Creates `.<file name>.<random>.tmp` in `dir`
fn create_temp_in(dir: &Path, destination: &Path) -> Result<NamedTempFile, FetchError> {
    let prefix = match destination.file_name() {
        Some(name) => format!(".{}.", name.to_string_lossy()),
        None => ".download.".to_string(),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");

    // tempfile defaults to 0600; ask for 0666 so the umask decides, like a plain create
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder
        .tempfile_in(dir)
        .map_err(|e| FetchError::CreateDestination {
            dir: dir.to_path_buf(),
            source: e,
        })
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

/// Copies `body` into `out`, checking the total against the declared length
///
/// The HTTP client usually reports a short body as a read error first; the
/// length check covers bodies that end cleanly but early.
fn copy_body(
    body: &mut impl Read,
    out: &mut impl Write,
    total: Option<u64>,
    progress: &dyn Progress,
) -> Result<u64, FetchError> {
    let mut downloaded: u64 = 0;
    let mut buffer = [0; CHUNK_SIZE];

    loop {
        let bytes_read = body
            .read(&mut buffer)
            .map_err(|e| FetchError::Stream {
                operation: "reading response body".to_string(),
                source: e,
            })?;

        if bytes_read == 0 {
            break;
        }

        out.write_all(&buffer[..bytes_read])
            .map_err(|e| FetchError::Stream {
                operation: "writing download file".to_string(),
                source: e,
            })?;

        downloaded += bytes_read as u64;
        progress.advance(downloaded);
    }

    if let Some(expected) = total
        && downloaded != expected
    {
        return Err(FetchError::Truncated {
            expected,
            actual: downloaded,
        });
    }

    Ok(downloaded)
}
