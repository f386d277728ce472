//! # Error Handling
//!
//! This module defines the centralized error type for the `update-vendor`
//! library. It uses `thiserror` to describe every way a run can be aborted,
//! with enough context attached for the CLI to print a useful diagnostic.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. None of them are retried; any
//!   error aborts the run at the point where it happened.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! - **`FileChange`** and **`DirtyKind`**: The diagnostic payload attached to
//!   `Error::DirtyWorkingTree`, so that the caller can list offending files.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which part of the repository was found to be dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyKind {
    /// Tracked files in the working tree differ from the index.
    Unstaged,
    /// The index differs from `HEAD`.
    Uncommitted,
}

impl fmt::Display for DirtyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirtyKind::Unstaged => f.write_str("unstaged"),
            DirtyKind::Uncommitted => f.write_str("uncommitted"),
        }
    }
}

/// One line of a `--name-status` diff listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Git status letter(s), e.g. `M`, `A`, `D`, `R100`.
    pub status: String,
    /// Path of the affected file, relative to the repository root.
    pub path: String,
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.status, self.path)
    }
}

/// Main error type for update-vendor operations
#[derive(Error, Debug)]
pub enum Error {
    /// The version-control executable could not be found on the search path.
    #[error("{tool} should be installed, but we couldn't find it. Aborting.")]
    ToolMissing { tool: String },

    /// The target directory is not inside a Git repository.
    #[error("This isn't a Git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    /// The working tree or index has changes that would be clobbered.
    ///
    /// `changes` holds the `--name-status` listing for display.
    #[error("Repository has {kind} changes")]
    DirtyWorkingTree {
        kind: DirtyKind,
        changes: Vec<FileChange>,
    },

    /// A vendor entry in the configuration file is missing data or invalid.
    ///
    /// `entry` is the 1-based position of the entry in the file.
    #[error("Malformed configuration (entry {entry}): {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    MalformedConfig {
        entry: usize,
        message: String,
        hint: Option<String>,
    },

    /// The configuration file could not be read.
    #[error("Failed to read configuration file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully where success was required.
    #[error("Command failed: {command} ({}){}", code.map(|c| format!("exit code {}", c)).unwrap_or_else(|| "terminated by signal".to_string()), if stderr.is_empty() { String::new() } else { format!(" - {}", stderr.trim_end()) })]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_tool_missing() {
        let error = Error::ToolMissing {
            tool: "Git".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git should be installed"));
        assert!(display.contains("couldn't find it"));
    }

    #[test]
    fn test_error_display_not_a_repository() {
        let error = Error::NotARepository {
            path: PathBuf::from("/tmp/nowhere"),
        };
        let display = format!("{}", error);
        assert!(display.contains("This isn't a Git repository"));
        assert!(display.contains("/tmp/nowhere"));
    }

    #[test]
    fn test_error_display_dirty_unstaged() {
        let error = Error::DirtyWorkingTree {
            kind: DirtyKind::Unstaged,
            changes: vec![FileChange {
                status: "M".to_string(),
                path: "README.md".to_string(),
            }],
        };
        assert_eq!(format!("{}", error), "Repository has unstaged changes");
    }

    #[test]
    fn test_error_display_dirty_uncommitted() {
        let error = Error::DirtyWorkingTree {
            kind: DirtyKind::Uncommitted,
            changes: Vec::new(),
        };
        assert_eq!(format!("{}", error), "Repository has uncommitted changes");
    }

    #[test]
    fn test_error_display_malformed_config() {
        let error = Error::MalformedConfig {
            entry: 2,
            message: "missing required field 'git_url'".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("entry 2"));
        assert!(display.contains("git_url"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_malformed_config_with_hint() {
        let error = Error::MalformedConfig {
            entry: 1,
            message: "missing required field 'path'".to_string(),
            hint: Some("Add 'path: vendor/<name>' to the entry".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("hint:"));
        assert!(display.contains("vendor/<name>"));
    }

    #[test]
    fn test_error_display_command_failed() {
        let error = Error::CommandFailed {
            command: "git fetch vendor_foo".to_string(),
            code: Some(128),
            stderr: "fatal: could not read from remote repository\n".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("git fetch vendor_foo"));
        assert!(display.contains("exit code 128"));
        assert!(display.ends_with("could not read from remote repository"));
    }

    #[test]
    fn test_error_display_command_failed_by_signal() {
        let error = Error::CommandFailed {
            command: "git pull".to_string(),
            code: None,
            stderr: String::new(),
        };
        let display = format!("{}", error);
        assert!(display.contains("terminated by signal"));
        assert!(!display.contains(" - "));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }

    #[test]
    fn test_file_change_display() {
        let change = FileChange {
            status: "A".to_string(),
            path: "src/new.rs".to_string(),
        };
        assert_eq!(change.to_string(), "A\tsrc/new.rs");
    }
}
