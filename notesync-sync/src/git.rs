//! [`NoteRepository`] over libgit2.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use git2::{
    BranchType, Cred, Delta, Diff, ErrorCode, PushOptions, RemoteCallbacks, Repository, Signature,
    Status, StatusOptions,
};

use notesync_core::{Author, Workspace};

use crate::error::SyncError;
use crate::vcs::{FileChange, NoteRepository};

const FALLBACK_NAME: &str = "notesync";
const FALLBACK_EMAIL: &str = "notesync@localhost";

/// A non-bare repository whose working tree is the notes root.
pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
    remote: String,
    author: Option<Author>,
}

impl GitRepository {
    /// Open the repository whose working tree is exactly `root`.
    ///
    /// Parent directories are not searched; a bare repository is rejected.
    pub fn open(
        root: &Path,
        remote: impl Into<String>,
        author: Option<Author>,
    ) -> Result<Self, SyncError> {
        let repo = Repository::open(root).map_err(|source| SyncError::NotARepository {
            path: root.to_path_buf(),
            source,
        })?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| SyncError::NotARepository {
                path: root.to_path_buf(),
                source: git2::Error::from_str("repository has no working tree"),
            })?;
        tracing::debug!(workdir = %workdir.display(), "opened repository");
        Ok(Self {
            repo,
            workdir,
            remote: remote.into(),
            author,
        })
    }

    /// [`GitRepository::open`] with remote and author taken from `ws`.
    pub fn open_at(ws: &Workspace) -> Result<Self, SyncError> {
        let config = ws.config();
        Self::open(ws.root(), config.remote.clone(), config.author.clone())
    }

    fn signature(&self) -> Result<Signature<'static>, SyncError> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            Err(_) => fallback_signature(self.author.as_ref()),
        }
    }

    /// Point `branch` at `<remote>/<branch>` after a successful push.
    ///
    /// The remote-tracking ref is moved to the pushed commit; the upstream is
    /// only written when the branch has none.
    fn record_upstream(&self, branch: &str) -> Result<(), SyncError> {
        let head = self.repo.head()?;
        let Some(tip) = head.target() else {
            return Ok(());
        };
        self.repo
            .reference(&self.tracking_ref(branch), tip, true, "notesync: push")?;

        let mut local = self.repo.find_branch(branch, BranchType::Local)?;
        match local.upstream() {
            Ok(_) => Ok(()),
            Err(e) if e.code() == ErrorCode::NotFound => {
                let upstream = format!("{}/{branch}", self.remote);
                local.set_upstream(Some(&upstream))?;
                tracing::info!(%upstream, "upstream set");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn tracking_ref(&self, branch: &str) -> String {
        format!("refs/remotes/{}/{branch}", self.remote)
    }

    fn head_tree(&self) -> Result<Option<git2::Tree<'_>>, SyncError> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e) if is_unborn(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Identity used when git has none: the configured author, else a fixed one.
fn fallback_signature(author: Option<&Author>) -> Result<Signature<'static>, SyncError> {
    let sig = match author {
        Some(author) => Signature::now(&author.name, &author.email),
        None => Signature::now(FALLBACK_NAME, FALLBACK_EMAIL),
    };
    sig.map_err(SyncError::Commit)
}

fn is_unborn(err: &git2::Error) -> bool {
    matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}

/// Collect one [`FileChange`] per delta; deletions report the old path.
fn changes(diff: &Diff<'_>) -> Vec<FileChange> {
    diff.deltas()
        .filter_map(|delta| {
            let deleted = delta.status() == Delta::Deleted;
            let file = if deleted {
                delta.old_file()
            } else {
                delta.new_file()
            };
            let path = file.path().or_else(|| delta.old_file().path())?;
            Some(FileChange {
                path: path.to_string_lossy().replace('\\', "/"),
                deleted,
            })
        })
        .collect()
}

impl NoteRepository for GitRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn untracked(&self) -> Result<Vec<String>, SyncError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().contains(Status::WT_NEW))
            .filter_map(|entry| entry.path().map(str::to_owned))
            .collect())
    }

    fn unstaged(&self) -> Result<Vec<FileChange>, SyncError> {
        let diff = self.repo.diff_index_to_workdir(None, None)?;
        Ok(changes(&diff))
    }

    fn staged(&self) -> Result<Vec<FileChange>, SyncError> {
        let tree = self.head_tree()?;
        let diff = self.repo.diff_tree_to_index(tree.as_ref(), None, None)?;
        Ok(changes(&diff))
    }

    fn stage(&mut self, path: &str) -> Result<(), SyncError> {
        let rel = Path::new(path);
        let stage_err = |source| SyncError::Stage {
            path: rel.to_path_buf(),
            source,
        };
        let mut index = self.repo.index()?;
        if self.workdir.join(rel).exists() {
            index.add_path(rel).map_err(stage_err)?;
        } else {
            index.remove_path(rel).map_err(stage_err)?;
        }
        index.write().map_err(stage_err)?;
        tracing::debug!(path, "staged");
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<String, SyncError> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree().map_err(SyncError::Commit)?;
        let tree = self.repo.find_tree(tree_id).map_err(SyncError::Commit)?;
        let sig = self.signature()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(SyncError::Commit)?),
            Err(e) if is_unborn(&e) => None,
            Err(e) => return Err(SyncError::Commit(e)),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let id = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .map_err(SyncError::Commit)?;
        tracing::info!(commit = %id, "committed");
        Ok(id.to_string())
    }

    fn unpushed_commits(&self) -> Result<usize, SyncError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if is_unborn(&e) => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let (Some(local), Some(name)) = (head.target(), head.shorthand()) else {
            return Ok(0);
        };
        if !head.is_branch() {
            return Ok(0);
        }

        let branch = self.repo.find_branch(name, BranchType::Local)?;
        match branch.upstream() {
            Ok(upstream) => {
                let Some(remote_tip) = upstream.get().target() else {
                    return Ok(0);
                };
                let (ahead, _behind) = self.repo.graph_ahead_behind(local, remote_tip)?;
                Ok(ahead)
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                if let Ok(remote_tip) = self.repo.refname_to_id(&self.tracking_ref(name)) {
                    let (ahead, _behind) = self.repo.graph_ahead_behind(local, remote_tip)?;
                    return Ok(ahead);
                }
                let mut walk = self.repo.revwalk()?;
                walk.push(local)?;
                Ok(walk.count())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn push(&mut self) -> Result<(), SyncError> {
        let head = self.repo.head().map_err(|e| SyncError::Push {
            message: e.message().to_string(),
        })?;
        let (refname, branch) = match (head.name(), head.shorthand()) {
            (Some(name), Some(short)) if head.is_branch() => (name.to_string(), short.to_string()),
            _ => {
                return Err(SyncError::Push {
                    message: "HEAD is not on a branch".to_string(),
                })
            }
        };
        let mut remote = self
            .repo
            .find_remote(&self.remote)
            .map_err(|_| SyncError::NoRemote {
                name: self.remote.clone(),
            })?;

        let refspec = format!("{refname}:{refname}");
        let cfg = self.repo.config().ok();
        let rejected: RefCell<Option<String>> = RefCell::new(None);

        {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(move |url, username_from_url, allowed| {
                if allowed.is_ssh_key() {
                    if let Some(user) = username_from_url {
                        return Cred::ssh_key_from_agent(user);
                    }
                }
                if allowed.is_user_pass_plaintext() {
                    if let Some(cfg) = cfg.as_ref() {
                        if let Ok(cred) = Cred::credential_helper(cfg, url, username_from_url) {
                            return Ok(cred);
                        }
                    }
                }
                Cred::default()
            });
            callbacks.push_update_reference(|name, status| {
                if let Some(msg) = status {
                    *rejected.borrow_mut() = Some(format!("{name} rejected: {msg}"));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);
            remote
                .push(&[refspec.as_str()], Some(&mut options))
                .map_err(|e| SyncError::Push {
                    message: e.message().to_string(),
                })?;
        }

        if let Some(message) = rejected.into_inner() {
            return Err(SyncError::Push { message });
        }
        tracing::info!(remote = %self.remote, refspec = %refspec, "pushed");

        if let Err(e) = self.record_upstream(&branch) {
            tracing::warn!(error = %e, "could not record upstream");
        }
        Ok(())
    }
}
