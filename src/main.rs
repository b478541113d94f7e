use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod core;
mod error;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; RUST_LOG overrides the default level
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    debug!("Starting comment-export v{}", env!("CARGO_PKG_VERSION"));

    cli.execute()
}
