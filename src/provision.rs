//! Snapshot provisioning: the bare mirror and the two checkouts of a commit.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::context::ServiceContext;
use crate::error::ProvisionError;
use crate::ports::git::HistoryPolicy;
use crate::project::{CommitId, Project, Side, SnapshotPair, WorkspaceLayout};

/// One mutex per mirror directory.
///
/// Mirrors are shared by every commit of a project, so clone, fetch and the
/// checkouts that read the mirror's index must not interleave.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl ProjectLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `mirror`, created on first use.
    #[must_use]
    pub fn lock_for(&self, mirror: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(mirror.to_path_buf()).or_default())
    }
}

/// Materializes mirrors and before/after checkouts under a workspace root.
pub struct SnapshotProvisioner<'a> {
    ctx: &'a ServiceContext,
    layout: WorkspaceLayout,
    history: HistoryPolicy,
    locks: Arc<ProjectLocks>,
}

impl<'a> SnapshotProvisioner<'a> {
    /// Creates a provisioner. Provisioners that may run concurrently must
    /// share the same `locks`.
    #[must_use]
    pub fn new(
        ctx: &'a ServiceContext,
        layout: WorkspaceLayout,
        history: HistoryPolicy,
        locks: Arc<ProjectLocks>,
    ) -> Self {
        Self {
            ctx,
            layout,
            history,
            locks,
        }
    }

    /// Workspace layout this provisioner writes to.
    #[must_use]
    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Ensures both snapshots exist and returns their paths.
    ///
    /// Failures are logged and swallowed: the returned paths are always the
    /// deterministic ones, whether or not their contents are complete.
    pub fn ensure_snapshots(&self, project: &Project, commit: &CommitId) -> SnapshotPair {
        match self.try_ensure_snapshots(project, commit) {
            Ok(pair) => pair,
            Err(err) => {
                warn!(%project, %commit, error = %err, "provisioning failed; continuing");
                self.layout.snapshots(project, commit)
            }
        }
    }

    /// Ensures both snapshots exist, reporting the first failure.
    ///
    /// A checkout directory that already exists counts as provisioned. When
    /// both exist the mirror is left alone, so repeating a call does no git
    /// work at all.
    ///
    /// # Errors
    ///
    /// Returns the first clone, fetch, directory, or checkout failure.
    pub fn try_ensure_snapshots(
        &self,
        project: &Project,
        commit: &CommitId,
    ) -> Result<SnapshotPair, ProvisionError> {
        let pair = self.layout.snapshots(project, commit);
        let mirror = self.layout.mirror(project);

        let lock = self.locks.lock_for(&mirror);
        let _guard: MutexGuard<'_, ()> = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let missing: Vec<Side> = [Side::Before, Side::After]
            .into_iter()
            .filter(|side| !self.ctx.fs.exists(pair.side(*side)))
            .collect();
        if missing.is_empty() {
            debug!(%project, commit = commit.short(), "snapshots already provisioned");
            return Ok(pair);
        }

        self.update_mirror(project, &mirror)?;

        for side in missing {
            let revision = match side {
                Side::Before => commit.first_parent_rev(),
                Side::After => commit.as_str().to_string(),
            };
            self.checkout(&mirror, &revision, pair.side(side))?;
        }
        Ok(pair)
    }

    fn update_mirror(&self, project: &Project, mirror: &Path) -> Result<(), ProvisionError> {
        if self.ctx.fs.exists(mirror) {
            info!(%project, mirror = %mirror.display(), history = %self.history, "fetching mirror");
            self.ctx
                .git
                .fetch_all(mirror, self.history)
                .map_err(|source| ProvisionError::Fetch {
                    mirror: mirror.to_path_buf(),
                    source,
                })
        } else {
            info!(%project, mirror = %mirror.display(), history = %self.history, "cloning mirror");
            self.ctx
                .git
                .clone_bare(project.reference(), mirror, self.history)
                .map_err(|source| ProvisionError::Clone {
                    remote: project.reference().to_string(),
                    mirror: mirror.to_path_buf(),
                    source,
                })
        }
    }

    fn checkout(&self, mirror: &Path, revision: &str, dir: &Path) -> Result<(), ProvisionError> {
        self.ctx
            .fs
            .create_dir_all(dir)
            .map_err(|source| ProvisionError::CreateDir {
                dir: dir.to_path_buf(),
                source,
            })?;

        debug!(revision, dir = %dir.display(), "checking out snapshot");
        if let Err(source) = self.ctx.git.checkout(mirror, revision, dir) {
            // An empty directory would otherwise pass for a finished checkout.
            if let Err(e) = self.ctx.fs.remove_dir_all(dir) {
                warn!(dir = %dir.display(), error = %e, "could not remove failed checkout");
            }
            return Err(ProvisionError::Checkout {
                revision: revision.to_string(),
                dir: dir.to_path_buf(),
                source,
            });
        }
        Ok(())
    }
}
