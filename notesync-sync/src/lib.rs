//! # notesync-sync
//!
//! Finds changed notes in a git working tree, refreshes their timestamps,
//! commits them and pushes.
//!
//! [`workflow::run`] drives the whole sequence over any [`NoteRepository`];
//! [`GitRepository`] is the libgit2-backed implementation.

pub mod discovery;
pub mod error;
pub mod git;
pub mod message;
pub mod vcs;
pub mod workflow;

pub use discovery::{discover, is_note_path, ModifiedNotes};
pub use error::SyncError;
pub use git::GitRepository;
pub use vcs::{FileChange, NoteRepository};
pub use workflow::{PendingStatus, PushOutcome, SyncOptions, SyncOutcome, SyncReport};
