//! bin CLI - share files as encrypted, base64-encoded wire maps
//!
//! This is the command-line interface for bincli. It provides a thin layer
//! over the core library: read a file, emit its wire map as JSON, and turn a
//! wire map back into a file.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod key;

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => errors::report(&e),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Encode(args) => commands::handle_encode(&AppContext::new(cli)?, args),
        Commands::Decode(args) => commands::handle_decode(&AppContext::new(cli)?, args),
        Commands::Type(args) => commands::handle_type(args),
        Commands::Completions(args) => commands::handle_completions(args),
    }
}

/// Logs go to stderr so stdout stays clean for wire maps and content.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
