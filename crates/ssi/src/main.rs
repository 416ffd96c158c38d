//! Service sign-in renderer CLI.
//!
//! Provides commands for:
//! - `render`: Render a service sign-in content file into a publishing API document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::RenderArgs;
use output::Output;

/// SSI - Service sign-in renderer.
#[derive(Parser)]
#[command(name = "ssi", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a content file into a publishing API document.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {}", error::error_chain(&err)));
        std::process::exit(1);
    }
}
