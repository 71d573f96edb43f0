//! CLI command implementations

pub mod cache;
pub mod resolve;
pub mod run;
