//! Binary crate for the `agri` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Starting the HTTP API
//! - Interactive configuration
//! - Human-friendly output for local lookups and predictions

use agri_core::logging::{self, LogFormat};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.default_log_level(), LogFormat::from_env())?;
    cmd.run().await
}
