// Core modules
pub mod config;
pub mod error;
pub mod path;
pub mod policy;

// Re-export commonly used types
pub use config::{Config, NetworkPolicy};
pub use error::{Result, ToolshedError};
pub use policy::{CachePolicy, TtlPolicy, is_expired};
