//! Shared test utilities for end-to-end tests.
//!
//! These tests drive the real `update-vendor` binary against throwaway Git
//! repositories created in a temporary directory: one host repository, plus
//! any number of upstream repositories that the host vendors from.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let fixture = TestFixture::new();
//!     let url = fixture.upstream("foo", &[("lib.txt", "hello")]);
//!     fixture.with_config(&configs::single("foo", &url, "vendor/foo", None));
//!     fixture.command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::{git_available, stderr_commands};
    pub use super::TestFixture;
}

/// Configuration YAML builders.
#[allow(dead_code)]
pub mod configs {
    /// A config with one entry.
    pub fn single(name: &str, url: &str, path: &str, srcpath: Option<&str>) -> String {
        let mut yaml = format!("- name: {name}\n  git_url: {url}\n  path: {path}\n");
        if let Some(srcpath) = srcpath {
            yaml.push_str(&format!("  srcpath: {srcpath}\n"));
        }
        yaml
    }

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "- name: [unclosed";

    /// An entry without `git_url`.
    pub const MISSING_URL: &str = "- name: foo\n  path: vendor/foo\n";
}

/// Whether `git --version` can be run. Tests that need real repositories
/// return early when it cannot.
pub fn git_available() -> bool {
    let available = Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !available {
        eprintln!("skipping: git is not installed");
    }
    available
}

/// The `+ git ...` lines a dry run printed, in order.
#[allow(dead_code)]
pub fn stderr_commands(stderr: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stderr)
        .lines()
        .filter(|line| line.starts_with("+ git "))
        .map(str::to_string)
        .collect()
}

/// Run git in `dir` with a fixed identity; panics on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "author@example.com")
        .env("GIT_COMMITTER_NAME", "Test Committer")
        .env("GIT_COMMITTER_EMAIL", "committer@example.com")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create a repository at `dir` whose first branch is `master`.
fn init_repo(dir: &Path) {
    std::fs::create_dir_all(dir).expect("Failed to create repository directory");
    git(dir, &["init", "-q"]);
    // Works on every git version, unlike `init -b`.
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/master"]);
}

/// A host repository (with one commit) inside a temporary directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a host repository containing a committed `README.md`.
    pub fn new() -> Self {
        let fixture = Self::without_repository();
        init_repo(&fixture.host());
        fixture.write("README.md", "# Host\n");
        fixture.commit_all("Initial commit");
        fixture
    }

    /// Create only the empty host directory.
    pub fn without_repository() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("host")
            .create_dir_all()
            .expect("Failed to create host directory");
        Self { temp_dir }
    }

    /// Path of the host repository.
    pub fn host(&self) -> PathBuf {
        self.temp_dir.path().join("host")
    }

    /// Write a file in the host working tree.
    pub fn write(&self, path: &str, content: &str) {
        self.temp_dir
            .child("host")
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
    }

    /// Read a file from the host working tree, if it exists.
    pub fn read(&self, path: &str) -> Option<String> {
        std::fs::read_to_string(self.host().join(path)).ok()
    }

    /// Stage everything and commit it in the host.
    pub fn commit_all(&self, message: &str) {
        git(&self.host(), &["add", "-A"]);
        git(&self.host(), &["commit", "-q", "-m", message]);
    }

    /// Write and commit `remotes.yaml`.
    pub fn with_config(&self, content: &str) -> &Self {
        self.write("remotes.yaml", content);
        self.commit_all("Add vendor configuration");
        self
    }

    /// Run git in the host repository.
    pub fn git(&self, args: &[&str]) -> String {
        git(&self.host(), args)
    }

    /// Create an upstream repository with `files` committed on `master`, and
    /// return its location for use as a `git_url`.
    pub fn upstream(&self, name: &str, files: &[(&str, &str)]) -> String {
        let dir = self.upstream_dir(name);
        init_repo(&dir);
        self.upstream_commit(name, files, "Initial upstream commit");
        dir.to_string_lossy().into_owned()
    }

    /// Add another commit to an upstream repository.
    pub fn upstream_commit(&self, name: &str, files: &[(&str, &str)], message: &str) {
        let dir = self.upstream_dir(name);
        for (path, content) in files {
            let file = dir.join(path);
            if let Some(parent) = file.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create upstream directory");
            }
            std::fs::write(&file, content).expect("Failed to write upstream file");
        }
        git(&dir, &["add", "-A"]);
        git(&dir, &["commit", "-q", "-m", message]);
    }

    /// Current commit of an upstream repository.
    pub fn upstream_head(&self, name: &str) -> String {
        git(&self.upstream_dir(name), &["rev-parse", "HEAD"])
    }

    fn upstream_dir(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join("upstreams").join(name)
    }

    /// A command running `update-vendor` in the host directory, with colors
    /// off, no config override leaking in from the environment, and
    /// repository discovery stopped at the temporary directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("update-vendor");
        cmd.current_dir(self.host())
            .env("NO_COLOR", "1")
            .env_remove("UPDATE_VENDOR_CONFIG")
            .env("GIT_CEILING_DIRECTORIES", self.temp_dir.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

