//! Error types for notesync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from local note operations.
#[derive(Debug, Error)]
pub enum NoteError {
    /// No template file at the configured location.
    #[error("template not found at {path}")]
    TemplateMissing { path: PathBuf },

    /// The template exists but could not be read.
    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `notes/<year>/` could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Exclusive creation found a file already at the destination.
    #[error("note already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Writing the note body failed after the file was opened.
    #[error("failed to write note to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O failure on a note file, with annotated path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `.notesync.yaml` exists but is not valid — includes serde_yaml line context.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Convenience constructor for [`NoteError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> NoteError {
    NoteError::Io {
        path: path.into(),
        source,
    }
}
