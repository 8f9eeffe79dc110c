//! cctree CLI - inspect the syntax tree libclang builds for a C/C++ file.
//!
//! Everything after `--` is handed to libclang unchanged:
//!
//! ```text
//! cctree print src/main.c -- -std=c11 -Iinclude
//! ```

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::SourceArgs;

/// cctree: owned syntax trees for C and C++ sources.
#[derive(Parser)]
#[command(name = "cctree")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tree, one kind per line, indented by depth
    Print {
        #[command(flatten)]
        source: SourceArgs,

        /// Also print each node's spelling and location
        #[arg(short, long)]
        long: bool,

        /// Fail if the parser reported any diagnostic
        #[arg(long)]
        strict: bool,
    },

    /// Dump the tree and diagnostics as JSON
    Json {
        #[command(flatten)]
        source: SourceArgs,

        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// List the diagnostics the parser reported
    Diagnostics {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show node counts per kind
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of kinds to list
        #[arg(short, long, default_value = "15")]
        top: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Print {
            source,
            long,
            strict,
        } => cli::print::run(&source, long, strict),
        Commands::Json { source, compact } => cli::json::run(&source, compact),
        Commands::Diagnostics { source } => cli::diagnostics::run(&source),
        Commands::Stats { source, top } => cli::stats::run(&source, top),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
