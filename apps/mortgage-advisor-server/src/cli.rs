//! Command line interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mortgage-advisor-server", version, about = "AI Mortgage Advisor API server")]
pub struct Cli {
    /// YAML configuration file (defaults to ./mortgage_advisor.yaml when present)
    #[arg(short, long, global = true, env = "MORTGAGE_ADVISOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve(ServeArgs),
    /// Apply database migrations and exit
    Migrate,
    /// Probe a running server's /health endpoint; exits non-zero when unhealthy
    CheckHealth(CheckHealthArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Serve(ServeArgs::default())
    }
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Override the configured bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the configured port
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Args)]
pub struct CheckHealthArgs {
    /// Health endpoint URL (defaults to the local server on the configured port)
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}
