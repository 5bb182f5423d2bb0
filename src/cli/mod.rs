//! CLI module for the search gateway
//!
//! - `serve`: run the HTTP gateway (default)
//! - `check-config`: load and validate configuration, then exit

pub mod check_config;
pub mod serve;

use clap::{Parser, Subcommand};

/// Caching search-request gateway
#[derive(Parser)]
#[command(name = "search-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP gateway (default mode)
    Serve,

    /// Validate configuration and print a summary
    CheckConfig,
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}
