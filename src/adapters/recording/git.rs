//! Recording adapter for the `GitClient` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::git::{GitClient, HistoryPolicy, TreeChange};

/// Records git interactions while delegating to an inner implementation.
pub struct RecordingGitClient {
    inner: Box<dyn GitClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitClient {
    /// Creates a new recording git client wrapping the given implementation.
    pub fn new(inner: Box<dyn GitClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CloneInput<'a> {
    remote: &'a str,
    mirror: &'a Path,
    history: HistoryPolicy,
}

#[derive(Serialize)]
struct FetchInput<'a> {
    mirror: &'a Path,
    history: HistoryPolicy,
}

#[derive(Serialize)]
struct CheckoutInput<'a> {
    mirror: &'a Path,
    revision: &'a str,
    work_tree: &'a Path,
}

#[derive(Serialize)]
struct CommitInput<'a> {
    mirror: &'a Path,
    commit: &'a str,
}

#[derive(Serialize)]
struct DiffInput<'a> {
    mirror: &'a Path,
    old: &'a str,
    new: &'a str,
}

impl GitClient for RecordingGitClient {
    fn clone_bare(
        &self,
        remote: &str,
        mirror: &Path,
        history: HistoryPolicy,
    ) -> Result<(), PortError> {
        let result = self.inner.clone_bare(remote, mirror, history);
        let input = CloneInput {
            remote,
            mirror,
            history,
        };
        record_result(&self.recorder, "git", "clone_bare", &input, &result);
        result
    }

    fn fetch_all(&self, mirror: &Path, history: HistoryPolicy) -> Result<(), PortError> {
        let result = self.inner.fetch_all(mirror, history);
        let input = FetchInput { mirror, history };
        record_result(&self.recorder, "git", "fetch_all", &input, &result);
        result
    }

    fn checkout(&self, mirror: &Path, revision: &str, work_tree: &Path) -> Result<(), PortError> {
        let result = self.inner.checkout(mirror, revision, work_tree);
        let input = CheckoutInput {
            mirror,
            revision,
            work_tree,
        };
        record_result(&self.recorder, "git", "checkout", &input, &result);
        result
    }

    fn first_parent(&self, mirror: &Path, commit: &str) -> Result<String, PortError> {
        let result = self.inner.first_parent(mirror, commit);
        let input = CommitInput { mirror, commit };
        record_result(&self.recorder, "git", "first_parent", &input, &result);
        result
    }

    fn tree_diff(
        &self,
        mirror: &Path,
        old: &str,
        new: &str,
    ) -> Result<Vec<TreeChange>, PortError> {
        let result = self.inner.tree_diff(mirror, old, new);
        let input = DiffInput { mirror, old, new };
        record_result(&self.recorder, "git", "tree_diff", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::git::LiveGitClient;

    #[test]
    fn records_failed_first_parent_as_err() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("git.cassette.yaml");
        let missing_mirror = dir.path().join("no-such-mirror");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        // Scope the adapter so it's dropped before we try to unwrap
        {
            let git = RecordingGitClient::new(Box::new(LiveGitClient), Arc::clone(&recorder));
            let result = git.first_parent(&missing_mirror, "0123456789abcdef");
            assert!(result.is_err());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        assert!(content.contains("first_parent"));
        assert!(content.contains("err"));
        assert!(content.contains("0123456789abcdef"));
    }
}
