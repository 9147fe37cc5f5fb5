//! The version-control capabilities the sync workflow relies on.
//!
//! [`crate::git::GitRepository`] implements this over libgit2; tests drive
//! the workflow with an in-memory implementation instead.

use std::path::Path;

use crate::error::SyncError;

/// One entry of a diff, with its path relative to the working tree root
/// (always `/`-separated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    /// The entry removes the file (it no longer exists on the newer side).
    pub deleted: bool,
}

impl FileChange {
    pub fn modified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            deleted: false,
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            deleted: true,
        }
    }
}

/// Porcelain operations over one working tree.
pub trait NoteRepository {
    /// Root of the working tree.
    fn workdir(&self) -> &Path;

    /// Untracked, non-ignored files.
    fn untracked(&self) -> Result<Vec<String>, SyncError>;

    /// Working tree vs index.
    fn unstaged(&self) -> Result<Vec<FileChange>, SyncError>;

    /// Index vs HEAD (everything, when HEAD is unborn).
    fn staged(&self) -> Result<Vec<FileChange>, SyncError>;

    /// Add `path` to the index, or remove it if it is gone from disk.
    fn stage(&mut self, path: &str) -> Result<(), SyncError>;

    /// Commit the index on top of HEAD; returns the new commit id.
    fn commit(&mut self, message: &str) -> Result<String, SyncError>;

    /// Commits on the current branch that its upstream does not have.
    ///
    /// A branch without upstream counts every commit it has.
    fn unpushed_commits(&self) -> Result<usize, SyncError>;

    /// Push the current branch to the configured remote.
    fn push(&mut self) -> Result<(), SyncError>;
}
