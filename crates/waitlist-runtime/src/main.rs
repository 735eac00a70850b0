//! # waitlist-admin
//!
//! Operator entry point. Logs go to stderr so command output stays
//! pipeable; `RUST_LOG` overrides the default `info` level.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use waitlist_runtime::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let output = cli::execute(args).await?;
    println!("{output}");
    Ok(())
}
