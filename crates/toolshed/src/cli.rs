//! CLI command structure using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use toolshed_artifact::ArtifactKind;

#[derive(Parser)]
#[command(name = "toolshed")]
#[command(version, about = "Fetch, cache and run shared ops tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to $TOOLSHED_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an artifact and print its local path
    Resolve {
        /// Artifact name, relative to the repository's tools/ directory
        name: String,

        #[arg(long, value_enum, default_value_t = KindArg::Config)]
        kind: KindArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a tool and run it, forwarding its exit code
    #[command(trailing_var_arg = true)]
    Run {
        /// Tool name
        tool: String,

        /// Arguments passed to the tool
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Inspect or clear the local artifact cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// List cached artifacts with their freshness
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove every cached artifact
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Config,
    Tool,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Config => ArtifactKind::Config,
            KindArg::Tool => ArtifactKind::Tool,
        }
    }
}
