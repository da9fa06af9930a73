// src/cli.rs
//! CLI definitions for the cairn resolver
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cairn")]
#[command(author = "Cairn Contributors")]
#[command(version)]
#[command(about = "Deterministic dependency resolution and build planning for source packages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve package specs and print the pinned dependency graph
    Resolve {
        /// Abstract specs, e.g. "libbson@1.6.1" or "mpich +shared fabrics=verbs"
        #[arg(required = true)]
        specs: Vec<String>,

        /// Directory of *.toml recipes
        #[arg(short, long, default_value = "recipes")]
        recipes: String,
    },

    /// Resolve package specs and print an ordered build plan
    Plan {
        /// Abstract specs to resolve
        #[arg(required = true)]
        specs: Vec<String>,

        /// Directory of *.toml recipes
        #[arg(short, long, default_value = "recipes")]
        recipes: String,

        /// Emit the plan as JSON for an executor
        #[arg(long)]
        json: bool,

        /// Parallel job count for make-style steps
        #[arg(short, long, default_value_t = 4)]
        jobs: u32,

        /// Directory installed packages live under
        #[arg(long, default_value = "/opt/cairn")]
        prefix_root: String,
    },

    /// Show what a recipe declares: versions, variants, dependencies
    Info {
        /// Package or virtual name
        package: String,

        /// Directory of *.toml recipes
        #[arg(short, long, default_value = "recipes")]
        recipes: String,
    },
}
