//! # Git Executor
//!
//! Every interaction with the `git` binary goes through this module.
//!
//! The design separates *how* a command is spawned from *what* is run:
//!
//! - **`CommandRunner`**: a trait that runs `git` with a list of arguments,
//!   either capturing output (queries) or inheriting stdio (mutations). The
//!   default implementation, [`SystemGit`], spawns the real binary; tests swap
//!   in a fake that records invocations.
//!
//! - **`Git`**: typed operations on top of a runner. Queries return parsed
//!   values (sets of remote names, diff listings). Mutations honor the
//!   [`RunMode`]: in `Simulate` mode they are printed as `+ git ...` and never
//!   reach the runner, while queries still run so that every decision made
//!   downstream matches what a real run would do.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, trace};

use crate::error::{Error, FileChange, Result};
use crate::output::Reporter;

/// Whether state-changing commands are executed or only printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Run every command.
    Execute,
    /// Print mutating commands instead of running them.
    Simulate,
}

impl RunMode {
    /// Map the `--dry-run` flag to a run mode.
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            RunMode::Simulate
        } else {
            RunMode::Execute
        }
    }
}

/// Result of running one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout (empty for pass-through runs).
    pub stdout: String,
    /// Captured stderr (empty for pass-through runs).
    pub stderr: String,
}

impl CommandOutput {
    fn from_status(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
            ..Self::default()
        }
    }
}

/// Trait for spawning git - allows faking in tests
pub trait CommandRunner {
    /// Run git with `args`, capturing stdout and stderr.
    fn capture(&self, args: &[&str]) -> Result<CommandOutput>;

    /// Run git with `args`, letting its output go straight to the terminal.
    fn passthrough(&self, args: &[&str]) -> Result<CommandOutput>;
}

/// The default `CommandRunner`, which spawns the system `git` inside the
/// host repository.
pub struct SystemGit {
    program: OsString,
    workdir: PathBuf,
}

impl SystemGit {
    /// Run `git` from the search path inside `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self::with_program("git", workdir)
    }

    /// Run a specific git executable inside `workdir`.
    pub fn with_program(program: impl Into<OsString>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.current_dir(&self.workdir).args(args);
        command
    }

    fn spawn_error(&self, error: std::io::Error) -> Error {
        if error.kind() == ErrorKind::NotFound {
            Error::ToolMissing {
                tool: "Git".to_string(),
            }
        } else {
            Error::Io(error)
        }
    }
}

impl CommandRunner for SystemGit {
    fn capture(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn passthrough(&self, args: &[&str]) -> Result<CommandOutput> {
        let status = self
            .command(args)
            .status()
            .map_err(|e| self.spawn_error(e))?;
        Ok(CommandOutput::from_status(status))
    }
}

/// Remotes and local branches as they existed when the snapshot was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub remotes: BTreeSet<String>,
    pub branches: BTreeSet<String>,
}

impl RepositorySnapshot {
    pub fn has_remote(&self, name: &str) -> bool {
        self.remotes.contains(name)
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.branches.contains(name)
    }
}

/// Typed git operations bound to one repository and one run mode.
pub struct Git<'a> {
    runner: Box<dyn CommandRunner + 'a>,
    root: PathBuf,
    mode: RunMode,
    reporter: &'a Reporter,
}

impl<'a> Git<'a> {
    /// Operate on the repository at `root` with the system git binary.
    pub fn system(root: impl Into<PathBuf>, mode: RunMode, reporter: &'a Reporter) -> Self {
        let root = root.into();
        Self::with_runner(Box::new(SystemGit::new(root.clone())), root, mode, reporter)
    }

    /// Operate through a custom runner.
    pub fn with_runner(
        runner: Box<dyn CommandRunner + 'a>,
        root: impl Into<PathBuf>,
        mode: RunMode,
        reporter: &'a Reporter,
    ) -> Self {
        Self {
            runner,
            root: root.into(),
            mode,
            reporter,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    ////// QUERIES //////

    /// Fails with `ToolMissing` when git cannot be spawned.
    pub fn ensure_installed(&self) -> Result<()> {
        self.query(&["--version"]).map(|_| ())
    }

    /// Whether `root` is inside a git working tree.
    pub fn is_repository(&self) -> Result<bool> {
        self.probe(&["status"])
    }

    /// Refresh stat information in the index so the diff checks below do not
    /// report files that were merely touched.
    ///
    /// This writes index metadata but no content, and runs in every mode.
    pub fn refresh_index(&self) -> Result<()> {
        self.query(&["update-index", "-q", "--ignore-submodules", "--refresh"])
            .map(|_| ())
    }

    /// Tracked files modified in the working tree but not staged.
    pub fn has_unstaged_changes(&self) -> Result<bool> {
        Ok(!self.probe(&["diff-files", "--quiet", "--ignore-submodules", "--"])?)
    }

    pub fn unstaged_changes(&self) -> Result<Vec<FileChange>> {
        let output = self.runner_capture(&[
            "diff-files",
            "--name-status",
            "-r",
            "--ignore-submodules",
            "--",
        ])?;
        Ok(parse_name_status(&output.stdout))
    }

    /// Changes staged in the index but not committed.
    pub fn has_staged_changes(&self) -> Result<bool> {
        Ok(!self.probe(&[
            "diff-index",
            "--cached",
            "--quiet",
            "HEAD",
            "--ignore-submodules",
            "--",
        ])?)
    }

    pub fn staged_changes(&self) -> Result<Vec<FileChange>> {
        let output = self.runner_capture(&[
            "diff-index",
            "--cached",
            "--name-status",
            "-r",
            "--ignore-submodules",
            "HEAD",
            "--",
        ])?;
        Ok(parse_name_status(&output.stdout))
    }

    /// Names of all configured remotes.
    pub fn remotes(&self) -> Result<BTreeSet<String>> {
        let stdout = self.query(&["remote"])?;
        Ok(parse_remotes(&stdout))
    }

    /// Names of all local branches.
    pub fn branches(&self) -> Result<BTreeSet<String>> {
        let stdout = self.query(&["branch", "--list"])?;
        Ok(parse_branches(&stdout))
    }

    pub fn snapshot(&self) -> Result<RepositorySnapshot> {
        Ok(RepositorySnapshot {
            remotes: self.remotes()?,
            branches: self.branches()?,
        })
    }

    /// Short name of the checked-out branch. Fails on a detached HEAD.
    pub fn current_ref(&self) -> Result<String> {
        let stdout = self.query(&["symbolic-ref", "-q", "--short", "HEAD"])?;
        Ok(stdout.trim().to_string())
    }

    ////// MUTATIONS //////

    pub fn remote_add(&self, name: &str, url: &str) -> Result<()> {
        self.mutate(&["remote", "add", name, url])
    }

    pub fn fetch(&self, remote: &str) -> Result<()> {
        self.mutate(&["fetch", remote])
    }

    /// Create `branch` tracking `upstream` (e.g. `vendor_foo/master`).
    pub fn branch_track(&self, branch: &str, upstream: &str) -> Result<()> {
        self.mutate(&["branch", "--track", branch, upstream])
    }

    pub fn checkout(&self, reference: &str) -> Result<()> {
        self.mutate(&["checkout", reference])
    }

    pub fn pull(&self) -> Result<()> {
        self.mutate(&["pull"])
    }

    /// Read `tree_ish` into the index under `prefix` and update the working
    /// tree to match.
    pub fn read_tree_prefix(&self, prefix: &str, tree_ish: &str) -> Result<()> {
        let prefix_arg = format!("--prefix={}", prefix);
        self.mutate(&["read-tree", &prefix_arg, "-u", tree_ish])
    }

    ////// PLUMBING //////

    fn runner_capture(&self, args: &[&str]) -> Result<CommandOutput> {
        debug!("query: {}", display_command(args));
        let output = self.runner.capture(args)?;
        trace!(
            "exit={:?} stdout={:?} stderr={:?}",
            output.code,
            output.stdout,
            output.stderr
        );
        Ok(output)
    }

    /// Run a query and report only whether it succeeded.
    fn probe(&self, args: &[&str]) -> Result<bool> {
        Ok(self.runner_capture(args)?.success)
    }

    /// Run a query that must succeed and return its stdout.
    fn query(&self, args: &[&str]) -> Result<String> {
        let output = self.runner_capture(args)?;
        if !output.success {
            return Err(Error::CommandFailed {
                command: display_command(args),
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }

    fn mutate(&self, args: &[&str]) -> Result<()> {
        let cmdline = display_command(args);
        match self.mode {
            RunMode::Simulate => {
                debug!("dry run, skipping: {}", cmdline);
                self.reporter.command(&cmdline);
                Ok(())
            }
            RunMode::Execute => {
                debug!("run: {}", cmdline);
                let output = self.runner.passthrough(args)?;
                if output.success {
                    Ok(())
                } else {
                    Err(Error::CommandFailed {
                        command: cmdline,
                        code: output.code,
                        stderr: output.stderr,
                    })
                }
            }
        }
    }
}

/// Render a git invocation the way a user would type it.
pub fn display_command(args: &[&str]) -> String {
    let mut cmdline = String::from("git");
    for arg in args {
        cmdline.push(' ');
        cmdline.push_str(arg);
    }
    cmdline
}

/// One remote name per line of `git remote`.
fn parse_remotes(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Branch names from `git branch --list`. Only the leading `* ` (current)
/// or `+ ` (other worktree) marker is removed; names may contain either
/// character. A detached HEAD line is skipped.
fn parse_branches(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix("* ")
                .or_else(|| line.strip_prefix("+ "))
                .unwrap_or(line)
                .trim()
        })
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}

/// Parse `--name-status` output. Renames and copies carry two paths, which are
/// joined with `->`.
fn parse_name_status(stdout: &str) -> Vec<FileChange> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut parts = line.split('\t');
            let status = parts.next().unwrap_or_default().trim().to_string();
            let path = parts.collect::<Vec<_>>().join(" -> ");
            FileChange { status, path }
        })
        .collect()
}

#[cfg(test)]
pub(crate) use fake::FakeRunner;
