//! Before/after file sets of a commit, computed from the mirror's history.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::config::SourceFilter;
use crate::context::ServiceContext;
use crate::error::ResolutionError;
use crate::ports::git::TreeChange;
use crate::project::CommitId;

/// Paths handed to the comparator for one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSets {
    /// Resolved first parent.
    pub parent: String,
    /// Paths present in the before-snapshot.
    pub before: Vec<String>,
    /// Paths present in the after-snapshot.
    pub after: Vec<String>,
    /// Old path to new path for renamed files.
    pub rename_hints: BTreeMap<String, String>,
}

/// Splits a commit's tree diff into before and after path lists.
pub struct FileSetResolver<'a> {
    ctx: &'a ServiceContext,
    filter: SourceFilter,
}

impl<'a> FileSetResolver<'a> {
    /// Creates a resolver keeping only paths accepted by `filter`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, filter: SourceFilter) -> Self {
        Self { ctx, filter }
    }

    /// Diffs `commit` against its first parent inside `mirror`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent cannot be resolved or the diff fails.
    pub fn resolve(&self, mirror: &Path, commit: &CommitId) -> Result<FileSets, ResolutionError> {
        let git = &self.ctx.git;
        let parent = git
            .first_parent(mirror, commit.as_str())
            .map_err(|source| ResolutionError::Parent {
                commit: commit.to_string(),
                source,
            })?;
        let changes = git
            .tree_diff(mirror, &parent, commit.as_str())
            .map_err(|source| ResolutionError::TreeDiff {
                parent: parent.clone(),
                commit: commit.to_string(),
                source,
            })?;

        let sets = split_changes(parent, &changes, &self.filter);
        debug!(
            commit = commit.short(),
            before = sets.before.len(),
            after = sets.after.len(),
            renames = sets.rename_hints.len(),
            "resolved file sets"
        );
        Ok(sets)
    }
}

/// Sorts tree changes into the two sides, dropping paths the filter rejects.
#[must_use]
pub fn split_changes(parent: String, changes: &[TreeChange], filter: &SourceFilter) -> FileSets {
    let mut sets = FileSets {
        parent,
        ..FileSets::default()
    };
    for change in changes {
        match change {
            TreeChange::Added { path } => {
                if filter.accepts(path) {
                    sets.after.push(path.clone());
                }
            }
            TreeChange::Removed { path } => {
                if filter.accepts(path) {
                    sets.before.push(path.clone());
                }
            }
            TreeChange::Modified { path } => {
                if filter.accepts(path) {
                    sets.before.push(path.clone());
                    sets.after.push(path.clone());
                }
            }
            TreeChange::Renamed { from, to } => {
                let keep_from = filter.accepts(from);
                let keep_to = filter.accepts(to);
                if keep_from {
                    sets.before.push(from.clone());
                }
                if keep_to {
                    sets.after.push(to.clone());
                }
                if keep_from && keep_to {
                    sets.rename_hints.insert(from.clone(), to.clone());
                }
            }
        }
    }
    sets
}
