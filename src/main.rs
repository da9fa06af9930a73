// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Resolve { specs, recipes }) => commands::resolve(&specs, &recipes),
        Some(Commands::Plan {
            specs,
            recipes,
            json,
            jobs,
            prefix_root,
        }) => commands::plan(&specs, &recipes, json, jobs, &prefix_root),
        Some(Commands::Info { package, recipes }) => commands::info(&package, &recipes),
        None => {
            // No command provided, show help
            println!("cairn v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'cairn --help' for usage information");
            Ok(())
        }
    }
}
