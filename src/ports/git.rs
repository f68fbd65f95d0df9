//! Git port for mirror maintenance and history queries.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// How much history a mirror keeps.
///
/// Both policies bound fetch cost at the price of reachability: a commit
/// (or its first parent) outside the kept window cannot be checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Keep commits newer than the date (`--shallow-since`).
    Since(NaiveDate),
    /// Keep the last `n` commits of every ref (`--depth`).
    Depth(u32),
}

impl HistoryPolicy {
    /// Cutoff used when nothing else is configured.
    #[must_use]
    pub fn default_cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 5, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The truncation flag passed to `git clone` and `git fetch`.
    #[must_use]
    pub fn git_arg(&self) -> String {
        match self {
            HistoryPolicy::Since(date) => format!("--shallow-since={}", date.format("%Y-%m-%d")),
            HistoryPolicy::Depth(depth) => format!("--depth={depth}"),
        }
    }
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        HistoryPolicy::Since(Self::default_cutoff())
    }
}

impl fmt::Display for HistoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.git_arg())
    }
}

/// One path changed between two trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TreeChange {
    /// Present only in the new tree.
    Added {
        /// New path.
        path: String,
    },
    /// Present only in the old tree.
    Removed {
        /// Old path.
        path: String,
    },
    /// Present in both trees with different content.
    Modified {
        /// Path in both trees.
        path: String,
    },
    /// Moved from one path to another, possibly with content changes.
    Renamed {
        /// Path in the old tree.
        from: String,
        /// Path in the new tree.
        to: String,
    },
}

/// Drives `git` against bare mirrors.
///
/// Every method names the mirror it operates on, so one client serves any
/// number of projects.
pub trait GitClient: Send + Sync {
    /// Creates a bare, history-truncated clone of `remote` at `mirror`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clone fails.
    fn clone_bare(&self, remote: &str, mirror: &Path, history: HistoryPolicy)
        -> Result<(), PortError>;

    /// Refreshes all refs of an existing mirror with the same truncation.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    fn fetch_all(&self, mirror: &Path, history: HistoryPolicy) -> Result<(), PortError>;

    /// Writes every tracked path of `revision` into `work_tree`.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision is unknown or the checkout fails.
    fn checkout(&self, mirror: &Path, revision: &str, work_tree: &Path) -> Result<(), PortError>;

    /// Resolves the first parent of `commit` to a full hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit or its parent is not in the mirror.
    fn first_parent(&self, mirror: &Path, commit: &str) -> Result<String, PortError>;

    /// Lists the paths that differ between two commits, with rename detection.
    ///
    /// # Errors
    ///
    /// Returns an error if either commit is unknown.
    fn tree_diff(&self, mirror: &Path, old: &str, new: &str) -> Result<Vec<TreeChange>, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_shallow_since_cutoff() {
        let policy = HistoryPolicy::default();
        assert_eq!(policy.git_arg(), "--shallow-since=2015-05-01");
        assert_eq!(HistoryPolicy::Depth(50).to_string(), "--depth=50");
    }

    #[test]
    fn tree_change_serializes_with_status_tag() {
        let change = TreeChange::Renamed {
            from: "a/Old.java".into(),
            to: "b/New.java".into(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["status"], "renamed");
        assert_eq!(json["to"], "b/New.java");
    }
}
