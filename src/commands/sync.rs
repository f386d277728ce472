//! # Sync Command Implementation
//!
//! Brings every vendor entry in `remotes.yaml` up to date.
//!
//! ## Functionality
//!
//! - **Safety check**: refuses to run unless `git` is installed, the target
//!   directory is a Git repository, and its working tree and index are clean.
//!
//! - **Reconciliation** (always): adds missing `vendor_<name>` remotes and
//!   `vendor_<name>_branch` tracking branches, and fetches every remote.
//!
//! - **Pull** (`--pull`): checks out each vendor branch, pulls it, and
//!   returns to the branch that was checked out before.
//!
//! - **Update** (`--update`): reads each vendor branch, or its `srcpath`
//!   subtree, into the entry's `path` in the working tree.
//!
//! - **Dry Run** (`--dry-run`): prints the git commands that would change
//!   the repository instead of running them.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use update_vendor::config;
use update_vendor::git::{Git, RunMode};
use update_vendor::guard;
use update_vendor::output::Reporter;
use update_vendor::suggestions;
use update_vendor::sync::{SyncOptions, VendorSync};

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Dry run mode (makes no changes)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Run 'git pull' on each vendor branch
    #[arg(short, long)]
    pub pull: bool,

    /// Update the data in the current repository from the vendor branches
    #[arg(short, long)]
    pub update: bool,

    /// Path to the vendor configuration file.
    ///
    /// Relative paths are resolved against the repository directory.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "UPDATE_VENDOR_CONFIG",
        default_value = config::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Host repository directory (defaults to the current directory)
    #[arg(short = 'C', long = "repo", value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,
}

/// Execute the sync command
pub fn execute(args: SyncArgs, reporter: &Reporter) -> Result<()> {
    let repo_dir = std::fs::canonicalize(&args.repo)
        .map_err(|_| suggestions::repo_dir_not_found(&args.repo))?;

    let mode = RunMode::from_dry_run(args.dry_run);
    let git = Git::system(&repo_dir, mode, reporter);

    git.ensure_installed()?;

    reporter.step(&format!("Updating git remotes in {}...", repo_dir.display()));
    if mode == RunMode::Simulate {
        reporter.detail("Dry run: commands that change the repository are printed, not run");
    }

    guard::ensure_clean(&git)?;

    let config_path = repo_dir.join(&args.config);
    if !config_path.exists() {
        return Err(suggestions::config_not_found(&config_path));
    }
    let entries = config::from_file(&config_path)?;
    log::debug!(
        "loaded {} vendor entr{} from {}",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        config_path.display()
    );

    let options = SyncOptions {
        pull: args.pull,
        update: args.update,
    };
    VendorSync::new(&git, reporter, options).run(&entries)?;

    reporter.step("Done!");
    Ok(())
}
