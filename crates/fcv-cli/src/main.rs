//! # fcv CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fcv_schema::SchemaSource;
use tracing_subscriber::EnvFilter;

use fcv_cli::validate::{run_validate, ValidateArgs};

/// FHIR consent validator.
///
/// Validates consent documents against the reference schema and projects
/// them into a simplified consent record.
#[derive(Parser, Debug)]
#[command(name = "fcv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the consent JSON schema. Empty selects the embedded schema.
    #[arg(long, global = true, env = "SCHEMA_PATH")]
    schema_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a consent document or print one of its fields.
    Validate(ValidateArgs),
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

    let schema = SchemaSource::from_config(cli.schema_path.as_deref());
    tracing::debug!(schema = %schema, "resolved schema source");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &schema),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
