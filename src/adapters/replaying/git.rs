//! Replaying adapter for the `GitClient` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::git::{GitClient, HistoryPolicy, TreeChange};

/// Replays recorded git operations from a cassette.
pub struct ReplayingGitClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitClient {
    /// Creates a new replaying git client from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl GitClient for ReplayingGitClient {
    fn clone_bare(
        &self,
        _remote: &str,
        _mirror: &Path,
        _history: HistoryPolicy,
    ) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "git", "clone_bare");
        replay_result(&output, "git::clone_bare")
    }

    fn fetch_all(&self, _mirror: &Path, _history: HistoryPolicy) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "git", "fetch_all");
        replay_result(&output, "git::fetch_all")
    }

    fn checkout(
        &self,
        _mirror: &Path,
        _revision: &str,
        _work_tree: &Path,
    ) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "git", "checkout");
        replay_result(&output, "git::checkout")
    }

    fn first_parent(&self, _mirror: &Path, _commit: &str) -> Result<String, PortError> {
        let output = next_output(&self.replayer, "git", "first_parent");
        replay_result(&output, "git::first_parent")
    }

    fn tree_diff(
        &self,
        _mirror: &Path,
        _old: &str,
        _new: &str,
    ) -> Result<Vec<TreeChange>, PortError> {
        let output = next_output(&self.replayer, "git", "tree_diff");
        replay_result(&output, "git::tree_diff")
    }
}
