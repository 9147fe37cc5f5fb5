//! The `sync` state machine.
//!
//! 1. Discover modified notes.
//! 2. No notes → push pending commits if asked to, otherwise stop.
//! 3. Check every note lies under `<root>/notes/`; one bad path aborts the
//!    run before any file or the index is touched.
//! 4. Refresh `Last updated` in every note still on disk.
//! 5. Stage each note.
//! 6. Nothing staged against HEAD → stop.
//! 7. Commit with the given or generated message.
//! 8. Push unless disabled.
//!
//! The repository is opened by the caller; every step after that is an
//! early-exit point reported through [`SyncOutcome`].

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;

use notesync_core::{timestamp, workspace::NOTES_DIR, NoteError};

use crate::discovery::{discover, ModifiedNotes};
use crate::error::SyncError;
use crate::message::commit_message;
use crate::vcs::NoteRepository;

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Commit message; generated from the notes when `None`.
    pub message: Option<String>,
    /// Push after committing (and push pending commits when nothing changed).
    pub push: bool,
}

/// Result of the push step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Push was not requested.
    Skipped,
    Pushed,
    /// The local commit is kept; re-running sync retries the push.
    Failed(String),
}

impl PushOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PushOutcome::Failed(_))
    }
}

/// Where the run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No modified notes. `push` is [`PushOutcome::Skipped`] unless
    /// `unpushed` earlier commits were found and a push was attempted.
    NoNotes { unpushed: usize, push: PushOutcome },
    /// Notes were staged but the index already matches HEAD.
    NoChanges,
    Committed {
        id: String,
        message: String,
        push: PushOutcome,
    },
}

/// A note whose timestamp could not be refreshed; the run carried on.
#[derive(Debug)]
pub struct NoteWarning {
    pub path: PathBuf,
    pub error: NoteError,
}

impl std::fmt::Display for NoteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "could not update timestamp in {}: {}",
            self.path.display(),
            self.error
        )
    }
}

/// Everything a sync run did.
#[derive(Debug)]
pub struct SyncReport {
    pub notes: ModifiedNotes,
    /// Notes whose `Last updated` line was rewritten.
    pub refreshed: usize,
    pub warnings: Vec<NoteWarning>,
    pub outcome: SyncOutcome,
}

/// Read-only view used by `notesync status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStatus {
    pub notes: ModifiedNotes,
    pub unpushed: usize,
}

// ---------------------------------------------------------------------------
// Path safety
// ---------------------------------------------------------------------------

/// Check `note` lies under `<root>/notes/` and return its `/`-separated
/// path relative to `root`.
///
/// The check is lexical (no `..`, no absolute components); for files that
/// exist it is repeated on canonical paths so symlinks cannot escape.
pub fn validate_note_path(note: &Path, root: &Path) -> Result<String, SyncError> {
    let unsafe_path = || SyncError::UnsafePath {
        path: note.to_path_buf(),
    };

    let rel = note.strip_prefix(root).map_err(|_| unsafe_path())?;
    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str().ok_or_else(unsafe_path)?),
            _ => return Err(unsafe_path()),
        }
    }
    if segments.first() != Some(&NOTES_DIR) || segments.len() < 2 {
        return Err(unsafe_path());
    }

    if note.exists() {
        let real_note = note.canonicalize().map_err(|_| unsafe_path())?;
        let real_notes_dir = root
            .join(NOTES_DIR)
            .canonicalize()
            .map_err(|_| unsafe_path())?;
        if !real_note.starts_with(&real_notes_dir) {
            return Err(unsafe_path());
        }
    }

    Ok(segments.join("/"))
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Repository-relative path of every note, or the first unsafe one.
fn validate_notes(notes: &ModifiedNotes, root: &Path) -> Result<Vec<String>, SyncError> {
    notes
        .iter()
        .map(|note| validate_note_path(note, root))
        .collect()
}

fn refresh_timestamps(notes: &ModifiedNotes, now: NaiveDateTime) -> (usize, Vec<NoteWarning>) {
    let mut refreshed = 0;
    let mut warnings = Vec::new();
    for note in notes {
        if !note.exists() {
            continue;
        }
        match timestamp::refresh_timestamp(note, now) {
            Ok(true) => refreshed += 1,
            Ok(false) => {}
            Err(error) => {
                tracing::warn!(path = %note.display(), %error, "timestamp not refreshed");
                warnings.push(NoteWarning {
                    path: note.clone(),
                    error,
                });
            }
        }
    }
    (refreshed, warnings)
}

fn stage_notes<R: NoteRepository + ?Sized>(
    repo: &mut R,
    paths: &[String],
) -> Result<(), SyncError> {
    for rel in paths {
        repo.stage(rel)?;
    }
    Ok(())
}

fn push_branch<R: NoteRepository + ?Sized>(repo: &mut R) -> PushOutcome {
    match repo.push() {
        Ok(()) => PushOutcome::Pushed,
        Err(e) => {
            tracing::warn!(error = %e, "push failed");
            PushOutcome::Failed(e.to_string())
        }
    }
}

fn unpushed_or_zero<R: NoteRepository + ?Sized>(repo: &R) -> usize {
    repo.unpushed_commits().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "cannot compare with upstream");
        0
    })
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run one sync over `repo`. `now` stamps timestamps and generated messages.
pub fn run<R: NoteRepository + ?Sized>(
    repo: &mut R,
    options: &SyncOptions,
    now: NaiveDateTime,
) -> Result<SyncReport, SyncError> {
    let notes = discover(repo)?;

    if notes.is_empty() {
        let unpushed = if options.push {
            unpushed_or_zero(repo)
        } else {
            0
        };
        let push = if unpushed > 0 {
            push_branch(repo)
        } else {
            PushOutcome::Skipped
        };
        return Ok(SyncReport {
            notes,
            refreshed: 0,
            warnings: Vec::new(),
            outcome: SyncOutcome::NoNotes { unpushed, push },
        });
    }

    let paths = validate_notes(&notes, repo.workdir())?;
    let (refreshed, warnings) = refresh_timestamps(&notes, now);
    stage_notes(repo, &paths)?;

    if repo.staged()?.is_empty() {
        tracing::info!("index matches HEAD; nothing to commit");
        return Ok(SyncReport {
            notes,
            refreshed,
            warnings,
            outcome: SyncOutcome::NoChanges,
        });
    }

    let message = options
        .message
        .clone()
        .unwrap_or_else(|| commit_message(notes.as_slice(), now));
    let id = repo.commit(&message)?;

    let push = if options.push {
        push_branch(repo)
    } else {
        PushOutcome::Skipped
    };

    Ok(SyncReport {
        notes,
        refreshed,
        warnings,
        outcome: SyncOutcome::Committed { id, message, push },
    })
}

/// Discovery and upstream comparison only; nothing is written.
pub fn status<R: NoteRepository + ?Sized>(repo: &R) -> Result<PendingStatus, SyncError> {
    Ok(PendingStatus {
        notes: discover(repo)?,
        unpushed: unpushed_or_zero(repo),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
