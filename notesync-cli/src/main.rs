//! notesync — timestamped markdown notes kept in git.
//!
//! # Usage
//!
//! ```text
//! notesync new <title> [--tags T] [--category C] [--summary S]
//! notesync sync [-m MESSAGE] [--no-push]
//! notesync status [--json]
//! ```
//!
//! Every command works on one notes root: `--root`, else `$NOTESYNC_ROOT`,
//! else the current directory.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{new::NewArgs, status::StatusArgs, sync::SyncArgs};
use notesync_core::Workspace;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "notesync",
    version,
    about = "Create timestamped notes and sync them through git",
    long_about = None,
)]
struct Cli {
    /// Notes root (the git working tree that holds `notes/` and `templates/`).
    #[arg(long, global = true, env = "NOTESYNC_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new note from the template.
    New(NewArgs),

    /// Refresh timestamps of changed notes, commit them and push.
    Sync(SyncArgs),

    /// List notes that the next sync would commit.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("could not determine current directory")?,
    };
    let workspace = Workspace::load_at(&root)
        .with_context(|| format!("failed to load workspace at '{}'", root.display()))?;
    tracing::debug!(root = %workspace.root().display(), "workspace loaded");

    match cli.command {
        Commands::New(args) => args.run(&workspace),
        Commands::Sync(args) => args.run(&workspace),
        Commands::Status(args) => args.run(&workspace),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
