//! `notesync sync` — refresh timestamps, commit changed notes, push.

use anyhow::{bail, Result};
use chrono::Local;
use clap::Args;

use notesync_core::Workspace;
use notesync_sync::{
    workflow::{self, SyncOptions},
    GitRepository, PushOutcome, SyncOutcome, SyncReport,
};

/// Arguments for `notesync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Custom commit message (default: generated from the notes).
    #[arg(short, long)]
    pub message: Option<String>,

    /// Commit but don't push to the remote.
    #[arg(long)]
    pub no_push: bool,
}

impl SyncArgs {
    pub fn run(self, workspace: &Workspace) -> Result<()> {
        let mut repo = GitRepository::open_at(workspace)?;
        let options = SyncOptions {
            message: self.message,
            push: !self.no_push,
        };

        println!("Checking for modified notes...");
        let report = workflow::run(&mut repo, &options, Local::now().naive_local())?;
        print_report(&report)
    }
}

fn print_report(report: &SyncReport) -> Result<()> {
    match &report.outcome {
        SyncOutcome::NoNotes { unpushed, push } => match push {
            PushOutcome::Skipped => println!("No notes to sync"),
            _ => {
                println!("No modified notes, but found unpushed commits ({unpushed})");
                println!("Pushing to remote...");
                finish_push(push, "Successfully pushed commits!")?;
            }
        },
        SyncOutcome::NoChanges => {
            print_progress(report);
            println!("No changes to commit");
        }
        SyncOutcome::Committed { message, push, .. } => {
            print_progress(report);
            println!("Committing: {message}");
            if matches!(push, PushOutcome::Skipped) {
                println!("Changes committed (not pushed)");
            } else {
                println!("Pushing to remote...");
                finish_push(push, "Successfully synced notes!")?;
            }
        }
    }
    Ok(())
}

fn print_progress(report: &SyncReport) {
    println!("Found {} modified note(s)", report.notes.len());
    println!("Updating timestamps...");
    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
    if report.refreshed > 0 {
        println!("Updated timestamps in {} note(s)", report.refreshed);
    }
    println!("Staging changes...");
}

fn finish_push(push: &PushOutcome, success: &str) -> Result<()> {
    match push {
        PushOutcome::Failed(error) => {
            bail!("{error}\ncommit succeeded; run `notesync sync` again to retry the push")
        }
        _ => {
            println!("{success}");
            Ok(())
        }
    }
}
