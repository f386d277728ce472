//! CLI argument parsing and command dispatch

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use update_vendor::error::Error;
use update_vendor::output::{OutputConfig, Reporter};
use update_vendor::suggestions;

use crate::commands;

/// Update vendored copies of external Git repositories
///
/// Reads remotes.yaml, makes sure every listed repository has a
/// `vendor_<name>` remote and a `vendor_<name>_branch` tracking branch, and
/// optionally pulls upstream changes and merges them into the working tree.
#[derive(Parser, Debug)]
#[command(name = "update-vendor")]
#[command(version, about, long_about)]
pub struct Cli {
    #[command(flatten)]
    sync: commands::sync::SyncArgs,

    /// Colorize output (always, never, auto)
    #[arg(
        long,
        global = true,
        value_name = "WHEN",
        default_value = "auto",
        value_parser = ["always", "never", "auto"],
        ignore_case = true
    )]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"],
        ignore_case = true
    )]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> ExitCode {
        init_logging(self.log_level.parse().unwrap_or(LevelFilter::Warn));

        let reporter = Reporter::stderr(OutputConfig::from_env_and_flag(&self.color));

        match commands::sync::execute(self.sync, &reporter) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                report_error(&reporter, &error);
                ExitCode::from(1)
            }
        }
    }
}

fn init_logging(level: LevelFilter) {
    // Logs share stderr with the marker lines, so keep them short.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

/// Print an error the way the rest of the output looks: a red marker line,
/// then any diagnostic detail.
fn report_error(reporter: &Reporter, error: &anyhow::Error) {
    match error.downcast_ref::<Error>() {
        Some(Error::DirtyWorkingTree { kind, changes }) => {
            reporter.error(&error.to_string());
            for change in changes {
                reporter.plain(&change.to_string());
            }
            for hint in suggestions::dirty_tree_hints(*kind) {
                reporter.plain(hint);
            }
        }
        _ => {
            // Hints are carried as extra lines of the message.
            let message = format!("{:#}", error);
            let mut lines = message.lines();
            reporter.error(lines.next().unwrap_or_default());
            for line in lines {
                reporter.plain(line);
            }
        }
    }
}
