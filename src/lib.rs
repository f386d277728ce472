//! # update-vendor
//!
//! This library keeps "vendored" copies of external Git repositories in
//! subdirectories of a host repository, using ordinary Git remotes and
//! branches as the transport. It backs the `update-vendor` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use update_vendor::config;
//!
//! let entries = config::parse(r#"
//! - name: foo
//!   git_url: https://example.com/foo.git
//!   path: vendor/foo
//!   srcpath: lib
//! "#).unwrap();
//!
//! assert_eq!(entries[0].remote_name(), "vendor_foo");
//! assert_eq!(entries[0].branch_name(), "vendor_foo_branch");
//! assert_eq!(entries[0].refspec(), "vendor_foo_branch:lib");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The `remotes.yaml` schema. Each entry names
//!   an upstream repository and the path it is vendored into.
//! - **Git executor (`git`)**: The only code that spawns `git`. It offers typed
//!   queries and mutations, and it honors a [`git::RunMode`], so a dry run
//!   prints mutations instead of running them.
//! - **Guard (`guard`)**: Refuses to continue unless the host repository is
//!   clean.
//! - **Sync engine (`sync`)**: Reconciles remotes and branches (pass 1), then
//!   updates the working tree (pass 2).
//! - **Output (`output`)**: The colored marker lines shown to the user.
//!
//! ## Execution Flow
//!
//! 1. Check that `git` is installed.
//! 2. [`guard::ensure_clean`]: the host must be a repository with a clean
//!    working tree and index.
//! 3. [`config::from_file`]: load the ordered list of vendor entries.
//! 4. [`sync::VendorSync::run`]: for each entry, add the remote if it is
//!    missing, fetch, add the tracking branch if it is missing, and optionally
//!    pull. Then, optionally, read each branch into its target path.

pub mod config;
pub mod error;
pub mod git;
pub mod guard;
pub mod output;
pub mod suggestions;
pub mod sync;
