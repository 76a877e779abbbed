#![allow(clippy::print_stdout, clippy::print_stderr)]

mod args;
mod handlers;

use crate::args::{Cli, Command};
use anyhow::Context;
use chub_kernel::config::load_app_config;
use chub_logger::Logger;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_app_config(cli.config.as_deref()).context("Loading configuration")?;
    let _logger = Logger::from_config(&config.logging).context("Initializing logger")?;

    match cli.command {
        Command::Keygen {} => handlers::values::keygen()?,
        Command::Encrypt { tenant, value } => {
            handlers::values::encrypt(&config.encryption, &tenant, value)?;
        }
        Command::Decrypt { tenant, value } => {
            handlers::values::decrypt(&config.encryption, &tenant, value)?;
        }
        Command::Inspect { value } => return handlers::values::inspect(value),
        Command::Seal { records } => handlers::records::seal(&config.encryption, &records).await?,
        Command::Open { records } => return handlers::records::open(&config.encryption, &records).await,
        Command::Registry {} => handlers::registry::print(&config.encryption),
    }

    Ok(ExitCode::SUCCESS)
}
