//! `notesync status` — what the next sync would pick up.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use notesync_core::Workspace;
use notesync_sync::{workflow, GitRepository, NoteRepository, PendingStatus};

/// Arguments for `notesync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusJson {
    notes: Vec<String>,
    unpushed: usize,
}

impl StatusArgs {
    pub fn run(self, workspace: &Workspace) -> Result<()> {
        let repo = GitRepository::open_at(workspace)?;
        let pending = workflow::status(&repo)?;
        let notes = relative_paths(&pending, repo.workdir());

        if self.json {
            let json = StatusJson {
                notes,
                unpushed: pending.unpushed,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes to sync");
        } else {
            println!("{} modified note(s):", notes.len());
            for note in &notes {
                println!("  {note}");
            }
        }
        if pending.unpushed > 0 {
            println!("{} unpushed commit(s)", pending.unpushed);
        }
        Ok(())
    }
}

fn relative_paths(pending: &PendingStatus, root: &Path) -> Vec<String> {
    pending
        .notes
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap_or(p)
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}
