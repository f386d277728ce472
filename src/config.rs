//! # Vendor Configuration
//!
//! This module defines the structure of the `remotes.yaml` file and the logic
//! for loading it into an ordered list of [`VendorEntry`] values.
//!
//! The file is a YAML sequence. Each record describes one external repository:
//!
//! ```yaml
//! - name: foo
//!   git_url: https://example.com/foo.git
//!   path: vendor/foo
//! - name: bar
//!   git_url: git@example.com:org/bar.git
//!   path: third_party/bar
//!   srcpath: lib/bar   # optional: only merge this subtree
//! ```
//!
//! Entry order is significant and preserved: entries are synchronized in the
//! order they appear in the file.
//!
//! ## Naming
//!
//! Every entry owns exactly one Git remote and one local tracking branch,
//! derived from its `name` by [`remote_name`] and [`branch_name`]. Because the
//! mapping is 1:1, names must be unique; [`parse`] rejects duplicates.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::suggestions;

/// Default configuration file name, looked up in the repository directory.
pub const DEFAULT_CONFIG_FILE: &str = "remotes.yaml";

/// Prefix shared by every remote and branch this tool manages.
pub const VENDOR_PREFIX: &str = "vendor_";

/// Upstream branch that tracking branches follow.
pub const UPSTREAM_BRANCH: &str = "master";

/// One externally-sourced repository to track and merge into the host tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorEntry {
    /// Unique key for this entry.
    pub name: String,
    /// Location of the upstream repository, in any form `git remote add` accepts.
    pub source_url: String,
    /// Destination directory, relative to the host repository root.
    pub target_path: String,
    /// Optional subtree of the upstream branch to merge instead of its root.
    pub source_subpath: Option<String>,
}

impl VendorEntry {
    /// Name of the Git remote for this entry.
    pub fn remote_name(&self) -> String {
        remote_name(&self.name)
    }

    /// Name of the local tracking branch for this entry.
    pub fn branch_name(&self) -> String {
        branch_name(&self.name)
    }

    /// Upstream ref the tracking branch is created against.
    pub fn upstream_ref(&self) -> String {
        format!("{}/{}", self.remote_name(), UPSTREAM_BRANCH)
    }

    /// Tree-ish handed to `git read-tree` when updating the working tree.
    ///
    /// This is the branch name, optionally scoped to `source_subpath` with the
    /// `<branch>:<path>` syntax.
    pub fn refspec(&self) -> String {
        match &self.source_subpath {
            Some(subpath) => format!("{}:{}", self.branch_name(), subpath),
            None => self.branch_name(),
        }
    }
}

/// Derive the remote name for a vendor entry name.
pub fn remote_name(name: &str) -> String {
    format!("{VENDOR_PREFIX}{name}")
}

/// Derive the tracking branch name for a vendor entry name.
pub fn branch_name(name: &str) -> String {
    format!("{VENDOR_PREFIX}{name}_branch")
}

/// Keys understood in an entry.
const KNOWN_KEYS: [&str; 4] = ["name", "git_url", "path", "srcpath"];

/// On-disk shape of an entry. Every field is optional here so that missing
/// keys can be reported per entry instead of as an opaque serde error.
#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    name: Option<String>,
    git_url: Option<String>,
    path: Option<String>,
    srcpath: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

/// Parse configuration text into an ordered list of vendor entries.
pub fn parse(yaml_content: &str) -> Result<Vec<VendorEntry>> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml_content)?;

    let records = match value {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        serde_yaml::Value::Sequence(records) => records,
        _ => {
            return Err(Error::MalformedConfig {
                entry: 0,
                message: "top level must be a list of vendor entries".to_string(),
                hint: Some("Start each entry with '- name: <name>'".to_string()),
            })
        }
    };

    let mut entries = Vec::with_capacity(records.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, record) in records.into_iter().enumerate() {
        let position = index + 1;
        let raw: RawEntry = serde_yaml::from_value(record).map_err(|e| Error::MalformedConfig {
            entry: position,
            message: e.to_string(),
            hint: Some("Each entry must be a mapping of string keys to string values".to_string()),
        })?;

        let entry = validate_entry(position, raw)?;

        if let Some(first) = seen.insert(entry.name.clone(), position) {
            return Err(Error::MalformedConfig {
                entry: position,
                message: format!(
                    "duplicate name '{}' (first defined in entry {})",
                    entry.name, first
                ),
                hint: Some("Each vendor name maps to one remote and one branch; rename one of them".to_string()),
            });
        }

        entries.push(entry);
    }

    Ok(entries)
}

/// Read and parse a configuration file.
pub fn from_file(path: &Path) -> Result<Vec<VendorEntry>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

fn validate_entry(position: usize, raw: RawEntry) -> Result<VendorEntry> {
    for key in raw.extra.keys() {
        warn!("entry {}: ignoring unknown key '{}'", position, key);
    }

    let name = required(position, "name", raw.name, "name: <short-identifier>", &raw.extra)?;
    let source_url = required(
        position,
        "git_url",
        raw.git_url,
        "git_url: https://host/repo.git",
        &raw.extra,
    )?;
    let target_path = required(position, "path", raw.path, "path: vendor/<name>", &raw.extra)?;

    if Path::new(&target_path).is_absolute() {
        return Err(Error::MalformedConfig {
            entry: position,
            message: format!("path '{}' must be relative to the repository root", target_path),
            hint: None,
        });
    }

    if raw.srcpath.is_none() {
        if let Some(key) = misspelling_of("srcpath", &raw.extra) {
            warn!(
                "entry {}: '{}' looks like a misspelling of 'srcpath'; the whole branch will be merged",
                position, key
            );
        }
    }

    let source_subpath = raw.srcpath.filter(|s| !s.trim().is_empty());

    Ok(VendorEntry {
        name,
        source_url,
        target_path,
        source_subpath,
    })
}

fn required(
    position: usize,
    field: &str,
    value: Option<String>,
    example: &str,
    extra: &BTreeMap<String, serde_yaml::Value>,
) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            let hint = match misspelling_of(field, extra) {
                Some(key) => format!("Did you mean '{}' instead of '{}'?", field, key),
                None => format!("Add '{}' to the entry", example),
            };
            Err(Error::MalformedConfig {
                entry: position,
                message: format!("missing required field '{}'", field),
                hint: Some(hint),
            })
        }
    }
}

/// An unknown key in `extra` that is closer to `field` than to any other
/// known key.
fn misspelling_of<'a>(field: &str, extra: &'a BTreeMap<String, serde_yaml::Value>) -> Option<&'a str> {
    extra
        .keys()
        .find(|key| suggestions::find_similar(key, &KNOWN_KEYS) == Some(field))
        .map(String::as_str)
}
