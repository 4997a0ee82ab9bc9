// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rotlog - write stdin to a size- and date-rotating log file

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{list, write};
use error::CliError;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "rotlog",
    version,
    about = "Write stdin to a log file that rotates by size and by day",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Active log file; archives go to an `old/` directory beside it
    path: Option<PathBuf>,

    #[command(flatten)]
    write: write::WriteArgs,

    /// Print rotlog's own diagnostics at debug level on stderr
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List archived files of a log, oldest first
    List(list::ListArgs),
}

fn setup_logging(debug: bool) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*};

    let filter = rotlog_core::logging::env_filter(rotlog_core::logging::level_filter(debug))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.debug)?;

    match cli.command {
        Some(Commands::List(args)) => list::handle(args),
        None => write::handle(cli.path, cli.write),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CliError>() {
                Some(cli_error) => eprint!("{}", cli_error),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
