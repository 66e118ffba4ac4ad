//! SpaceMap: disk space usage analyser.
//!
//! Thin binary entry point. All logic lives in the `spacemap-core`
//! and `spacemap-app` crates.

use clap::Parser;
use spacemap_app::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging. Stdout carries the report, so logs go
    // to stderr.
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("SpaceMap starting");

    spacemap_app::run(&cli)
}
