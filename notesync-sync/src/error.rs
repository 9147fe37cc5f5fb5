//! Error types for notesync-sync.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can end a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The root directory is not the working tree of a git repository.
    #[error("not a git repository: {path}")]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// Any other libgit2 failure (status, diff, index I/O).
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// Adding or removing one path in the index failed.
    #[error("failed to stage {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// A discovered path resolved outside `<root>/notes/`.
    #[error("invalid note path: {path}")]
    UnsafePath { path: PathBuf },

    #[error("failed to commit: {0}")]
    Commit(#[source] git2::Error),

    /// The configured remote does not exist.
    #[error("no remote named '{name}' is configured")]
    NoRemote { name: String },

    /// Push failed or the server rejected the ref update.
    #[error("failed to push: {message}")]
    Push { message: String },
}
