//! # Error Suggestions
//!
//! Helpers for building error messages that say what went wrong AND how to
//! fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use update_vendor::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::error::DirtyKind;

/// Generate an error for when the configuration file is not found.
///
/// Includes hints about:
/// - Creating a remotes.yaml file
/// - Using the -c/--config flag
/// - Using the UPDATE_VENDOR_CONFIG environment variable
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a remotes.yaml file in your repository root\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set UPDATE_VENDOR_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for a `-C/--repo` directory that does not exist.
pub fn repo_dir_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Repository directory not found: {path}\n\n\
         hint: Use -C/--repo to point at the root of the host repository",
        path = path.display()
    )
}

/// Hint lines to show after a dirty-tree listing.
pub fn dirty_tree_hints(kind: DirtyKind) -> &'static [&'static str] {
    match kind {
        DirtyKind::Unstaged => &[
            "hint: Commit or stash your changes before updating vendored code",
            "hint: Run 'git stash' to set them aside, then 'git stash pop' afterwards",
        ],
        DirtyKind::Uncommitted => &[
            "hint: Commit the staged changes before updating vendored code",
            "hint: Run 'git reset' to unstage them if they are not ready",
        ],
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
pub fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0usize; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}
