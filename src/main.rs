//! Entry point for renta, a car-rental demo with a tool-calling support agent.
//!
//! This binary loads environment variables, parses CLI arguments via [`cli`],
//! and dispatches to the appropriate subcommand handler.

mod agent;
mod chat;
mod cli;
mod config;
mod constants;
mod data;
mod dates;
mod format;
mod message;
mod output;
mod provider;
mod retriever;
mod seed;
mod thread;
mod tools;

use anyhow::Result;

/// Runs the renta CLI.
///
/// Loads `.env` files (silently ignored if absent), initializes logging,
/// parses command-line arguments into a [`cli::Cli`] struct, and dispatches
/// the chosen subcommand via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = cli::parse();
    cli::run(cli).await
}
