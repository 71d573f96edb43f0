//! Global context for CLI commands

use crate::progress::BarProgress;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use toolshed_artifact::Resolver;
use toolshed_core::{Config, TtlPolicy};

/// Loaded configuration shared by all commands
pub struct Context {
    pub config: Config,
    pub verbose: bool,
}

impl Context {
    /// Load configuration from `config_path` or the default locations
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or an
    /// environment override is invalid
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self> {
        let config = Config::load(config_path).context("Failed to load configuration")?;
        Ok(Self { config, verbose })
    }

    /// Resolver with a terminal progress bar
    ///
    /// # Errors
    ///
    /// Returns an error if no repository base is configured
    pub fn resolver(&self) -> Result<Resolver<TtlPolicy>> {
        Ok(Resolver::from_config(&self.config)?.progress(BarProgress::new()))
    }

    /// Cache directory, whether or not it exists yet
    pub fn tools_dir(&self) -> Result<PathBuf> {
        Ok(self.config.tools_dir()?)
    }
}
