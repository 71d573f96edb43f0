//! Cache commands - inspect and clear the artifact cache

use crate::context::Context;
use anyhow::{Context as _, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use toolshed_core::is_expired;
use walkdir::WalkDir;

/// One cached artifact
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CacheEntry {
    /// Name relative to the cache root, `/`-separated
    pub name: String,
    pub size: u64,
    pub stale: bool,
}

/// List cached artifacts with their freshness under the configured TTL
pub fn list(ctx: &Context, json: bool) -> Result<()> {
    let tools_dir = ctx.tools_dir()?;
    let entries = scan(&tools_dir, ctx.config.ttl())?;

    if json {
        let output = json!({
            "tools_dir": tools_dir.display().to_string(),
            "ttl_secs": ctx.config.ttl().as_secs(),
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No cached artifacts in {}", tools_dir.display());
        return Ok(());
    }

    println!("{} {}\n", "→".cyan(), tools_dir.display());
    for entry in &entries {
        let state = if entry.stale {
            "stale".yellow()
        } else {
            "fresh".green()
        };
        println!("  {:<40} {:>10}  {}", entry.name, entry.size, state);
    }

    Ok(())
}

/// Remove the whole cache directory
pub fn clear(ctx: &Context) -> Result<()> {
    let tools_dir = ctx.tools_dir()?;

    match fs::remove_dir_all(&tools_dir) {
        Ok(()) => println!("{} Removed {}", "✓".green().bold(), tools_dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            println!("Cache is already empty: {}", tools_dir.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to remove {}", tools_dir.display()));
        }
    }

    Ok(())
}

/// Walks `tools_dir` for cached files, skipping in-flight download temp files
pub fn scan(tools_dir: &Path, ttl: Duration) -> Result<Vec<CacheEntry>> {
    if !tools_dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(tools_dir).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to read cache {}", tools_dir.display()))?;
        if !entry.file_type().is_file() || is_download_temp(entry.path()) {
            continue;
        }

        let relative = entry.path().strip_prefix(tools_dir)?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let size = entry.metadata()?.len();

        entries.push(CacheEntry {
            name,
            size,
            stale: is_expired(entry.path(), ttl),
        });
    }

    Ok(entries)
}

fn is_download_temp(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .is_some_and(|n| n.starts_with('.') && n.ends_with(".tmp"))
}
