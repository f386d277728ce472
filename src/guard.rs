//! # Repository Guard
//!
//! Nothing in the host repository may be touched unless it is a Git working
//! tree with no unstaged and no uncommitted changes. [`ensure_clean`] checks
//! both and returns the offending files so the caller can show them.

use log::debug;

use crate::error::{DirtyKind, Error, Result};
use crate::git::Git;

/// Verify that the repository exists and that its working tree and index are
/// clean.
///
/// The index refresh this performs runs in every [`RunMode`](crate::git::RunMode),
/// since it is needed for an accurate answer and never alters content.
pub fn ensure_clean(git: &Git<'_>) -> Result<()> {
    if !git.is_repository()? {
        return Err(Error::NotARepository {
            path: git.root().to_path_buf(),
        });
    }

    git.refresh_index()?;

    if git.has_unstaged_changes()? {
        let changes = git.unstaged_changes()?;
        debug!("{} unstaged change(s)", changes.len());
        return Err(Error::DirtyWorkingTree {
            kind: DirtyKind::Unstaged,
            changes,
        });
    }

    if git.has_staged_changes()? {
        let changes = git.staged_changes()?;
        debug!("{} staged change(s)", changes.len());
        return Err(Error::DirtyWorkingTree {
            kind: DirtyKind::Uncommitted,
            changes,
        });
    }

    Ok(())
}
