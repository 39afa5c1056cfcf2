//! Refactory - design smell detection CLI
//!
//! Detects design smells with static rules and asks an LLM for concrete
//! refactoring suggestions, batched to respect free-tier rate limits.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use refactory::cli;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    cli::run(args)
}
