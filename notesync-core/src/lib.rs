//! notesync core library — workspace config, note creation, timestamps.
//!
//! - [`workspace`] — root directory + `.notesync.yaml`
//! - [`slug`] / [`template`] / [`note`] — `notesync new`
//! - [`timestamp`] — the `Last updated` line rewritten by `notesync sync`
//! - [`error`] — [`NoteError`]

pub mod error;
pub mod note;
pub mod slug;
pub mod template;
pub mod timestamp;
pub mod workspace;

pub use error::NoteError;
pub use note::{create_note_at, NewNote};
pub use workspace::{Author, Config, NoteDefaults, Workspace};
