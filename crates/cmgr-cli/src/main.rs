//! # cmgr CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmgr_cli::coerce::{run_coerce, CoerceArgs};
use cmgr_cli::validate::{run_validate, ValidateArgs};

/// Content manager CLI
///
/// Validates content-type descriptors and applies the field coercion
/// contract (boolean, enumeration, string, text, richtext) to payloads.
#[derive(Parser, Debug)]
#[command(name = "cmgr", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate content-type descriptor files or directories.
    Validate(ValidateArgs),

    /// Validate a write payload against a content type and print the result.
    Coerce(CoerceArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Coerce(args) => run_coerce(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
