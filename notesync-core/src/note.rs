//! Note creation: template rendering, filename derivation, exclusive write.
//!
//! ## `create_note_at` — steps
//!
//! 1. Check the template exists.
//! 2. Render it with title / date / time / tags / summary / category.
//! 3. Derive `<date>-<slug>-<hex6>.md`.
//! 4. `mkdir -p notes/<year>/`.
//! 5. Create the file with `create_new` — never overwrite.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime};
use rand::Rng;

use crate::error::NoteError;
use crate::slug::slug_or_untitled;
use crate::template::{self, TemplateContext};
use crate::workspace::{NoteDefaults, Workspace, NOTE_EXTENSION};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Bytes of randomness in a filename; rendered as twice as many hex chars.
const SUFFIX_BYTES: usize = 3;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Everything the user supplies for a new note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub tags: String,
    pub category: String,
    pub summary: String,
}

impl NewNote {
    /// A note titled `title` with every other field taken from `defaults`.
    pub fn new(title: impl Into<String>, defaults: &NoteDefaults) -> Self {
        Self {
            title: title.into(),
            tags: defaults.tags.clone(),
            category: defaults.category.clone(),
            summary: defaults.summary.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filename
// ---------------------------------------------------------------------------

/// Six lowercase hex chars from the thread-local CSPRNG.
pub fn random_suffix() -> String {
    let mut bytes = [0u8; SUFFIX_BYTES];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// `<date>-<slug>-<suffix>.md`
pub fn note_filename(date: &str, title: &str, suffix: &str) -> String {
    format!(
        "{date}-{}-{suffix}.{NOTE_EXTENSION}",
        slug_or_untitled(title)
    )
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Create `path` with `content`, failing with [`NoteError::AlreadyExists`]
/// rather than touching an existing file.
pub fn write_exclusive(path: &Path, content: &str) -> Result<(), NoteError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            ErrorKind::AlreadyExists => NoteError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => NoteError::Write {
                path: path.to_path_buf(),
                source,
            },
        })?;
    file.write_all(content.as_bytes())
        .map_err(|source| NoteError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// `<root>/notes/<year>/`, created if absent.
fn ensure_year_dir(ws: &Workspace, year: &str) -> Result<PathBuf, NoteError> {
    let dir = ws.year_dir(year);
    std::fs::create_dir_all(&dir).map_err(|source| NoteError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Create a new note under `notes/<year>/` and return its path.
pub fn create_note_at(
    ws: &Workspace,
    note: &NewNote,
    now: NaiveDateTime,
) -> Result<PathBuf, NoteError> {
    let date = now.format(DATE_FORMAT).to_string();
    let filename = note_filename(&date, &note.title, &random_suffix());
    create_note_named(ws, note, now, &filename)
}

/// [`create_note_at`] with a caller-chosen filename.
pub fn create_note_named(
    ws: &Workspace,
    note: &NewNote,
    now: NaiveDateTime,
    filename: &str,
) -> Result<PathBuf, NoteError> {
    let date = now.format(DATE_FORMAT).to_string();
    let time = now.format(TIME_FORMAT).to_string();
    let year = format!("{:04}", now.year());

    let ctx = TemplateContext {
        title: &note.title,
        date: &date,
        time: &time,
        tags: &note.tags,
        summary: &note.summary,
        category: &note.category,
    };
    let content = template::render_file(&ws.template_path(), &ctx)?;

    let path = ensure_year_dir(ws, &year)?.join(filename);
    write_exclusive(&path, &content)?;

    tracing::info!(path = %path.display(), "created note");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
