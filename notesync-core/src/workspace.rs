//! Notes workspace: the root directory plus its optional `.notesync.yaml`.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   .notesync.yaml              (optional)
//!   templates/note_template.md  (default template location)
//!   notes/
//!     <yyyy>/
//!       <yyyy-mm-dd>-<slug>-<hex6>.md
//! ```
//!
//! The root is resolved once by the binary and handed to every entry point;
//! nothing in the libraries looks it up on its own.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, NoteError};

/// Directory (directly under the root) that holds every note.
pub const NOTES_DIR: &str = "notes";

/// Extension every note file carries.
pub const NOTE_EXTENSION: &str = "md";

/// File name of the optional per-workspace config.
pub const CONFIG_FILE: &str = ".notesync.yaml";

pub const DEFAULT_TEMPLATE: &str = "templates/note_template.md";
pub const DEFAULT_REMOTE: &str = "origin";

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

/// Contents of `.notesync.yaml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Template path, relative to the root.
    pub template: PathBuf,
    /// Remote that `sync` pushes to.
    pub remote: String,
    pub defaults: NoteDefaults,
    pub author: Option<Author>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: PathBuf::from(DEFAULT_TEMPLATE),
            remote: DEFAULT_REMOTE.to_string(),
            defaults: NoteDefaults::default(),
            author: None,
        }
    }
}

/// Fallback values for `notesync new` options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoteDefaults {
    pub tags: String,
    pub category: String,
    pub summary: String,
}

impl Default for NoteDefaults {
    fn default() -> Self {
        Self {
            tags: "general".to_string(),
            category: "default".to_string(),
            summary: "Add summary here".to_string(),
        }
    }
}

/// Commit identity used when git config has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// A resolved notes root and its configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Load the workspace rooted at `root`, reading `.notesync.yaml` if present.
    ///
    /// Returns [`NoteError::ConfigParse`] (with path + line context) if the
    /// file exists but is malformed.
    pub fn load_at(root: impl Into<PathBuf>) -> Result<Self, NoteError> {
        let root = root.into();
        let path = root.join(CONFIG_FILE);
        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            if contents.trim().is_empty() {
                Config::default()
            } else {
                serde_yaml::from_str(&contents)
                    .map_err(|source| NoteError::ConfigParse { path, source })?
            }
        } else {
            Config::default()
        };
        tracing::debug!(root = %root.display(), "loaded workspace");
        Ok(Self { root, config })
    }

    /// Build a workspace from an in-memory config; nothing is read from disk.
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `<root>/<template>` — pure, no I/O.
    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.config.template)
    }

    /// `<root>/notes/`
    pub fn notes_dir(&self) -> PathBuf {
        self.root.join(NOTES_DIR)
    }

    /// `<root>/notes/<year>/`
    pub fn year_dir(&self, year: &str) -> PathBuf {
        self.notes_dir().join(year)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
