use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolshedError {
    // Config errors
    #[error("CONFIG_NOT_FOUND: no configuration at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    #[error("CONFIG_NO_CACHE_DIR: could not determine a cache directory, set cache.dir")]
    NoCacheDir,

    // Path errors
    #[error("PATH_INVALID: '{}': {reason}", path.display())]
    PathInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ToolshedError>;
