//! # Vendor Sync Engine
//!
//! Synchronizes every configured [`VendorEntry`] in two passes:
//!
//! 1. **Reconciliation**: for each entry, in file order, make sure the remote
//!    exists, fetch it, make sure the tracking branch exists, and (with
//!    `pull`) run a checkout-pull-checkout cycle on that branch.
//! 2. **Tree update**: with `update`, read each entry's branch (or a subtree
//!    of it) into the working tree under the entry's path.
//!
//! Pass 2 starts only after pass 1 has finished for every entry. It edits the
//! tree of the branch that was checked out when the run began.
//!
//! Remotes and branches are listed once, before pass 1. Whatever pass 1
//! creates is not added to that snapshot.
//!
//! A failure at any step aborts the run. In particular, a failed pull leaves
//! the vendor branch checked out: the checkout back to the original branch is
//! only reached when the pull succeeds.

use log::debug;

use crate::config::VendorEntry;
use crate::error::Result;
use crate::git::{Git, RepositorySnapshot};
use crate::output::Reporter;

/// Which optional stages of a run are enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Pull each vendor branch from its upstream during pass 1.
    pub pull: bool,
    /// Read each vendor branch into the working tree during pass 2.
    pub update: bool,
}

/// What a run did (or, in simulate mode, would have done).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub remotes_added: usize,
    pub branches_created: usize,
    pub branches_pulled: usize,
    pub trees_updated: usize,
}

/// Drives both passes over a list of entries.
pub struct VendorSync<'g, 'r> {
    git: &'g Git<'r>,
    reporter: &'r Reporter,
    options: SyncOptions,
}

impl<'g, 'r> VendorSync<'g, 'r> {
    pub fn new(git: &'g Git<'r>, reporter: &'r Reporter, options: SyncOptions) -> Self {
        Self {
            git,
            reporter,
            options,
        }
    }

    /// Run pass 1 for all entries, then pass 2 if enabled.
    pub fn run(&self, entries: &[VendorEntry]) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();

        let snapshot = self.git.snapshot()?;
        debug!(
            "snapshot: {} remote(s), {} branch(es)",
            snapshot.remotes.len(),
            snapshot.branches.len()
        );

        self.reconcile(entries, &snapshot, &mut summary)?;

        if self.options.update {
            self.update_trees(entries, &mut summary)?;
        }

        debug!("{:?}", summary);
        Ok(summary)
    }

    /// Pass 1 over every entry against a fixed snapshot.
    pub fn reconcile(
        &self,
        entries: &[VendorEntry],
        snapshot: &RepositorySnapshot,
        summary: &mut SyncSummary,
    ) -> Result<()> {
        for entry in entries {
            self.reconcile_entry(entry, snapshot, summary)?;
        }
        Ok(())
    }

    fn reconcile_entry(
        &self,
        entry: &VendorEntry,
        snapshot: &RepositorySnapshot,
        summary: &mut SyncSummary,
    ) -> Result<()> {
        let remote = entry.remote_name();
        let branch = entry.branch_name();

        self.reporter.entry(&format!("Checking {}", entry.name));

        if snapshot.has_remote(&remote) {
            self.reporter
                .detail(&format!("Remote already exists: {}", remote));
        } else {
            self.reporter
                .detail(&format!("Adding remote: {} {}", remote, entry.source_url));
            self.git.remote_add(&remote, &entry.source_url)?;
            summary.remotes_added += 1;
        }

        self.git.fetch(&remote)?;

        if snapshot.has_branch(&branch) {
            self.reporter
                .detail(&format!("Branch already exists: {}", branch));
        } else {
            self.reporter.detail(&format!("Adding branch: {}", branch));
            self.git.branch_track(&branch, &entry.upstream_ref())?;
            summary.branches_created += 1;
        }

        if self.options.pull {
            self.pull_branch(&branch)?;
            summary.branches_pulled += 1;
        }

        Ok(())
    }

    fn pull_branch(&self, branch: &str) -> Result<()> {
        let original = self.git.current_ref()?;

        self.reporter
            .detail(&format!("Running 'git pull' on branch: {}", branch));

        self.git.checkout(branch)?;
        self.git.pull()?;
        self.git.checkout(&original)
    }

    /// Pass 2: read every entry's refspec into its target path.
    pub fn update_trees(&self, entries: &[VendorEntry], summary: &mut SyncSummary) -> Result<()> {
        for entry in entries {
            let refspec = entry.refspec();
            self.reporter.detail(&format!(
                "Using refspec '{}' to update: {}",
                refspec, entry.target_path
            ));
            self.git.read_tree_prefix(&entry.target_path, &refspec)?;
            summary.trees_updated += 1;
        }
        Ok(())
    }
}
