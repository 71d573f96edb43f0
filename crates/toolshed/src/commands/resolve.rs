//! Resolve command - print the local path of an artifact

use crate::context::Context;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use toolshed_artifact::ArtifactKind;

/// Resolve `name` and print where it lives
///
/// Plain output is the path alone so it can be captured by scripts; the
/// origin is added with `--verbose`.
pub fn run(ctx: &Context, name: &str, kind: ArtifactKind, json: bool) -> Result<()> {
    let resolver = ctx.resolver()?;
    let location = resolver.resolve_artifact(name, kind)?;

    if json {
        let output = json!({
            "name": name,
            "kind": kind,
            "path": location.path.display().to_string(),
            "origin": location.origin,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if ctx.verbose {
        println!(
            "{} {}",
            location.path.display(),
            format!("({})", location.origin).dimmed()
        );
    } else {
        println!("{}", location.path.display());
    }

    Ok(())
}
