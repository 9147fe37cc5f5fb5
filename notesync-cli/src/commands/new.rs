//! `notesync new <title> [--tags ...] [--category ...] [--summary ...]`

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use notesync_core::{create_note_at, NewNote, Workspace};

/// Create a new timestamped note.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Title of the note.
    pub title: String,

    /// Comma-separated tags [default: general].
    #[arg(long)]
    pub tags: Option<String>,

    /// Note category [default: default].
    #[arg(long)]
    pub category: Option<String>,

    /// Short description shown in the frontmatter [default: Add summary here].
    #[arg(long)]
    pub summary: Option<String>,
}

impl NewArgs {
    pub fn run(self, workspace: &Workspace) -> Result<()> {
        let mut note = NewNote::new(self.title, &workspace.config().defaults);
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
        if let Some(category) = self.category {
            note.category = category;
        }
        if let Some(summary) = self.summary {
            note.summary = summary;
        }

        let path = create_note_at(workspace, &note, Local::now().naive_local())
            .with_context(|| format!("could not create note '{}'", note.title))?;

        println!("Created note: {}", path.display());
        Ok(())
    }
}
