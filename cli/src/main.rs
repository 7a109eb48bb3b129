mod args;
mod commands;
mod prompt;
mod render;
mod shell;
mod transport;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use person_core::{ApiConfig, PersonClient};

use args::Cli;

/// Logs go to stderr so they never mix with the table on stdout. Quiet by
/// default; `RUST_LOG=debug` shows every request.
fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<ExitCode> {
    setup_tracing();
    let cli = Cli::parse();

    let api_url = match cli.base_url {
        Some(url) => url,
        None => ApiConfig::from_env()
            .context("invalid PERSONS_* environment")?
            .api_url(),
    };
    tracing::debug!(%api_url, "using API");

    let color = !cli.no_color && std::io::stdout().is_terminal();
    commands::run(cli.command, PersonClient::new(&api_url), color)
}
