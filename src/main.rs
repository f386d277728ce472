//! # update-vendor CLI
//!
//! This is the binary entry point for the `update-vendor` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the sync command.
//! - Turning errors into a red marker line on stderr and exit code 1.
//!
//! The core logic lives in the `update_vendor` library crate; the binary is a
//! thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli.execute()
}
