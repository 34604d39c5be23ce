//! wd CLI - `WaveDrom` markdown preprocessor.
//!
//! Provides commands for:
//! - `render`: Replace `wavedrom` blocks in markdown documents with rendered images
//! - `init`: Prepare the image directory without processing documents

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{InitArgs, RenderArgs};
use output::Output;

/// wd - `WaveDrom` markdown preprocessor.
#[derive(Parser)]
#[command(name = "wd", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render wavedrom blocks in markdown documents.
    Render(RenderArgs),
    /// Create the image directory and show the effective settings.
    Init(InitArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN.
    // Logs go to stderr: stdout carries processed documents.
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Init(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&err);
        std::process::exit(1);
    }
}
