//! Which notes in the working tree need syncing.
//!
//! Three sources are merged in order, first discovery wins:
//!
//! 1. untracked files
//! 2. working tree vs index (unstaged edits and deletions)
//! 3. index vs HEAD (staged changes)
//!
//! Diff entries must still exist on disk unless they are deletions, so that a
//! removed note can be staged as a removal.

use std::path::{Path, PathBuf};

use notesync_core::workspace::{NOTES_DIR, NOTE_EXTENSION};

use crate::error::SyncError;
use crate::vcs::{FileChange, NoteRepository};

/// Whether a repository-relative path names a note.
///
/// Backslashes are read as separators; the first segment must be exactly
/// `notes` and the last must carry a `.md` extension with a non-empty stem.
pub fn is_note_path(path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    let mut segments = normalized.split('/');
    if segments.next() != Some(NOTES_DIR) {
        return false;
    }
    let Some(file_name) = segments.last() else {
        return false;
    };
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == NOTE_EXTENSION)
}

/// Ordered, de-duplicated absolute paths of notes needing attention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifiedNotes {
    paths: Vec<PathBuf>,
}

impl ModifiedNotes {
    /// Append `<root>/<rel>` unless it is already listed, or `require_exists`
    /// is set and nothing is on disk there. Returns whether it was added.
    pub fn insert(&mut self, root: &Path, rel: &str, require_exists: bool) -> bool {
        let path = root.join(rel.replace('\\', "/"));
        if self.paths.contains(&path) {
            return false;
        }
        if require_exists && !path.exists() {
            tracing::debug!(path = %path.display(), "skipping vanished path");
            return false;
        }
        self.paths.push(path);
        true
    }

    fn insert_change(&mut self, root: &Path, change: &FileChange) -> bool {
        self.insert(root, &change.path, !change.deleted)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl<'a> IntoIterator for &'a ModifiedNotes {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Collect every note that is untracked, modified, deleted or staged.
pub fn discover<R: NoteRepository + ?Sized>(repo: &R) -> Result<ModifiedNotes, SyncError> {
    let root = repo.workdir().to_path_buf();
    let mut notes = ModifiedNotes::default();

    for path in repo.untracked()? {
        if is_note_path(&path) {
            notes.insert(&root, &path, true);
        }
    }
    for change in repo.unstaged()? {
        if is_note_path(&change.path) {
            notes.insert_change(&root, &change);
        }
    }
    for change in repo.staged()? {
        if is_note_path(&change.path) {
            notes.insert_change(&root, &change);
        }
    }

    tracing::debug!(count = notes.len(), "discovered modified notes");
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("notes/2025/test.md", true)]
    #[case("notes/test.md", true)]
    #[case("notes\\2025\\test.md", true)]
    #[case("docs/readme.md", false)]
    #[case("notes/test.txt", false)]
    #[case("test.md", false)]
    #[case("", false)]
    #[case("notes", false)]
    #[case("notes/.md", false)]
    #[case("Notes/2025/test.md", false)]
    #[case("docs/notes/test.md", false)]
    #[case("notes/2025/test.MD", false)]
    #[case("notesx/test.md", false)]
    fn classifies_note_paths(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_note_path(path), expected, "{path:?}");
    }

    #[test]
    fn insert_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("test.md"), "x").unwrap();
        let mut notes = ModifiedNotes::default();

        assert!(notes.insert(dir.path(), "test.md", true));
        assert!(!notes.insert(dir.path(), "nonexistent.md", true));
        assert_eq!(notes.as_slice(), &[dir.path().join("test.md")]);
    }

    #[test]
    fn insert_skips_duplicates_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let mut notes = ModifiedNotes::default();
        assert!(notes.insert(dir.path(), "b.md", false));
        assert!(notes.insert(dir.path(), "a.md", false));
        assert!(!notes.insert(dir.path(), "b.md", false));
        assert_eq!(
            notes.as_slice(),
            &[dir.path().join("b.md"), dir.path().join("a.md")]
        );
    }

    #[test]
    fn deletions_do_not_need_to_exist() {
        let dir = TempDir::new().unwrap();
        let mut notes = ModifiedNotes::default();
        assert!(notes.insert_change(dir.path(), &FileChange::deleted("notes/gone.md")));
        assert!(!notes.insert_change(dir.path(), &FileChange::modified("notes/also-gone.md")));
        assert_eq!(notes.len(), 1);
    }
}
