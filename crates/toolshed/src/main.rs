mod cli;
mod commands;
mod context;
mod progress;

use clap::Parser;
use cli::{CacheCommands, Cli, Commands};
use context::Context;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = Context::new(cli.config.as_deref(), cli.verbose).and_then(|ctx| {
        match cli.command {
            Commands::Resolve { name, kind, json } => {
                commands::resolve::run(&ctx, &name, kind.into(), json).map(|()| 0)
            }
            Commands::Run { tool, args } => commands::run::run(&ctx, &tool, &args),
            Commands::Cache(cache_cmd) => match cache_cmd {
                CacheCommands::List { json } => commands::cache::list(&ctx, json).map(|()| 0),
                CacheCommands::Clear => commands::cache::clear(&ctx).map(|()| 0),
            },
        }
    });

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
