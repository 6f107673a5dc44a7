//! # revdashctl: revdash settings console
//!
//! Composition root that wires every adapter together and exposes the
//! settings facade and the collaborator services as subcommands.
//!
//! ## Responsibilities
//! - Parse CLI arguments and load configuration (file, env vars)
//! - Initialise `tracing` with the configured filter (logs go to stderr)
//! - Construct adapters: file or memory storage, headless document,
//!   manual colour-scheme source, simulated marketplace, demo profile store
//! - Construct application services, injecting adapters via port traits
//! - Run the requested command
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod cli;
mod commands;
mod config;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    init_tracing(&config.logging.filter);

    commands::run(cli.command, &config).await
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter `{filter}` ({err}), falling back to `warn`");
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
