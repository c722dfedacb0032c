#![warn(clippy::pedantic)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;

mod artifact;
mod cli;
mod command;
mod constants;
mod context;
mod error;
#[cfg(test)]
mod fixtures;
mod github;
mod job;
mod runner;
mod utils;

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_tracing();

    // Every failure ends up as the step’s error message
    if let Err(error) = run().await {
        job::set_failed(&error);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let mut cli = cli::Cli::from_args(std::env::args_os())?;
    let github = github::client(&cli.inputs.take_token(), &cli.github.api_url)?;
    runner::Runner::new(Arc::new(github), cli)?.run().await
}
