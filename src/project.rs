//! Project references, commit ids, and the on-disk workspace layout.
//!
//! ```text
//! <root>/
//!   ├── <repoFolder>/                 bare mirror
//!   ├── v0/<repoFolder>-<short>/      before (first parent)
//!   └── v1/<repoFolder>-<short>/      after (the commit)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// Number of commit-id characters used in checkout folder names.
pub const SHORT_COMMIT_LEN: usize = 7;

/// A remote repository reference such as `https://github.com/org/repo.git`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Project {
    reference: String,
    folder: String,
}

impl Project {
    /// Parses a reference and derives its local folder name.
    ///
    /// The folder is the final path segment with a trailing extension
    /// removed, so `https://github.com/jabref/jabref.git` maps to `jabref`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::EmptyFolder`] when no folder name remains or
    /// the name would be hidden (leading `.`), as for `https://host/org/.git`.
    pub fn parse(reference: &str) -> Result<Self, ProjectError> {
        let trimmed = reference.trim().trim_end_matches('/');
        let segment = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
        let folder = match segment.rfind('.') {
            Some(idx) if idx > 0 => &segment[..idx],
            _ => segment,
        };
        if folder.is_empty() || folder.starts_with('.') {
            return Err(ProjectError::EmptyFolder(reference.to_string()));
        }
        Ok(Self {
            reference: trimmed.to_string(),
            folder: folder.to_string(),
        })
    }

    /// The reference as handed to `git clone`.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Local folder name of the mirror.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}

/// A commit hash, at least [`SHORT_COMMIT_LEN`] hex characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    /// Validates a commit id.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::InvalidCommit`] for short or non-hex input.
    pub fn parse(raw: &str) -> Result<Self, ProjectError> {
        let raw = raw.trim();
        if raw.len() < SHORT_COMMIT_LEN || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ProjectError::InvalidCommit(raw.to_string()));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Full hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First seven characters, used in checkout folder names.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..SHORT_COMMIT_LEN]
    }

    /// Revision expression naming the first parent.
    #[must_use]
    pub fn first_parent_rev(&self) -> String {
        format!("{}~1", self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which end of a commit a snapshot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The commit's first parent.
    Before,
    /// The commit itself.
    After,
}

impl Side {
    /// Top-level directory under the workspace root.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Side::Before => "v0",
            Side::After => "v1",
        }
    }
}

/// Computes every path the pipeline touches, relative to one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<repoFolder>`
    #[must_use]
    pub fn mirror(&self, project: &Project) -> PathBuf {
        self.root.join(project.folder())
    }

    /// `<root>/<v0|v1>/<repoFolder>-<short>`
    #[must_use]
    pub fn checkout(&self, project: &Project, commit: &CommitId, side: Side) -> PathBuf {
        self.root
            .join(side.prefix())
            .join(format!("{}-{}", project.folder(), commit.short()))
    }

    /// Both checkout paths of a commit.
    #[must_use]
    pub fn snapshots(&self, project: &Project, commit: &CommitId) -> SnapshotPair {
        SnapshotPair {
            before: self.checkout(project, commit, Side::Before),
            after: self.checkout(project, commit, Side::After),
        }
    }
}

/// Checkout directories of the two sides of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotPair {
    /// Checkout of the first parent.
    pub before: PathBuf,
    /// Checkout of the commit.
    pub after: PathBuf,
}

impl SnapshotPair {
    /// Path for one side.
    #[must_use]
    pub fn side(&self, side: Side) -> &Path {
        match side {
            Side::Before => &self.before,
            Side::After => &self.after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMIT: &str = "b5c3a87e3ed6f2c9b1ad4c0a7f5fd92dd2a1e001";

    #[test]
    fn folder_strips_extension() {
        let project = Project::parse("https://github.com/jabref/jabref.git").unwrap();
        assert_eq!(project.folder(), "jabref");
        assert_eq!(project.reference(), "https://github.com/jabref/jabref.git");
    }

    #[test]
    fn folder_without_extension_is_kept() {
        let project = Project::parse("https://github.com/apache/commons-lang/").unwrap();
        assert_eq!(project.folder(), "commons-lang");
    }

    #[test]
    fn folder_from_scp_style_reference() {
        let project = Project::parse("git@github.com:square/okhttp.git").unwrap();
        assert_eq!(project.folder(), "okhttp");
    }

    #[test]
    fn folder_keeps_inner_dots() {
        let project = Project::parse("file:///srv/git/my.lib.git").unwrap();
        assert_eq!(project.folder(), "my.lib");
    }

    #[test]
    fn empty_reference_is_rejected() {
        assert!(matches!(
            Project::parse("https://"),
            Err(ProjectError::EmptyFolder(_))
        ));
        assert!(Project::parse("").is_err());
    }

    #[test]
    fn dot_leading_folder_is_rejected() {
        for reference in ["https://h/o/.git", "https://h/o/..", "/srv/.hidden"] {
            let result = Project::parse(reference);
            assert!(
                matches!(result, Err(ProjectError::EmptyFolder(_))),
                "{reference} accepted"
            );
        }
    }

    #[test]
    fn commit_must_be_hex_and_long_enough() {
        assert!(CommitId::parse("abc12").is_err());
        assert!(CommitId::parse("xyz1234567").is_err());
        let commit = CommitId::parse(COMMIT).unwrap();
        assert_eq!(commit.short(), "b5c3a87");
        assert_eq!(commit.first_parent_rev(), format!("{COMMIT}~1"));
    }

    #[test]
    fn layout_paths() {
        let layout = WorkspaceLayout::new("/data/eval");
        let project = Project::parse("https://github.com/jabref/jabref.git").unwrap();
        let commit = CommitId::parse(COMMIT).unwrap();

        assert_eq!(layout.mirror(&project), PathBuf::from("/data/eval/jabref"));
        let pair = layout.snapshots(&project, &commit);
        assert_eq!(pair.before, PathBuf::from("/data/eval/v0/jabref-b5c3a87"));
        assert_eq!(pair.after, PathBuf::from("/data/eval/v1/jabref-b5c3a87"));
        assert_eq!(pair.side(Side::After), pair.after.as_path());
    }
}
