//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};

use crate::adapters::live::{CommandComparator, LiveFileSystem, LiveGitClient};
use crate::adapters::recording::{RecordingComparator, RecordingFileSystem, RecordingGitClient};
use crate::adapters::replaying::{ReplayingComparator, ReplayingFileSystem, ReplayingGitClient};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::error::PortError;
use crate::ports::comparator::Comparator;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::{GitClient, HistoryPolicy, TreeChange};
use crate::relationship::{ComparisonRequest, RelationshipGraph};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, replaying,
/// recording). The context is `Sync`, so one instance can be shared by every
/// worker of a batch run.
pub struct ServiceContext {
    /// Filesystem for the checkout directories.
    pub fs: Box<dyn FileSystem>,
    /// Git client for mirrors.
    pub git: Box<dyn GitClient>,
    /// Structural comparator.
    pub comparator: Box<dyn Comparator>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        git: Box<dyn GitClient>,
        comparator: Box<dyn Comparator>,
    ) -> Self {
        Self {
            fs,
            git,
            comparator,
        }
    }

    /// Creates a live context. Without a comparator command every comparison
    /// fails with a message saying so.
    #[must_use]
    pub fn live(comparator: Option<&str>) -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            git: Box::new(LiveGitClient),
            comparator: live_comparator(comparator),
        }
    }

    /// Creates a live context whose interactions are recorded into a new
    /// session below `base`. Call [`RecordingSession::finish`] after the
    /// context has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(
        base: PathBuf,
        comparator: Option<&str>,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new_in(&base)?;
        let ctx = Self {
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                session.fs.clone(),
            )),
            git: Box::new(RecordingGitClient::new(
                Box::new(LiveGitClient),
                session.git.clone(),
            )),
            comparator: Box::new(RecordingComparator::new(
                live_comparator(comparator),
                session.comparator.clone(),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a directory written by a recording
    /// session.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette file cannot be read or parsed.
    pub fn replaying(session_dir: &Path) -> Result<Self, String> {
        Self::replaying_from(&CassetteConfig::from_session_dir(session_dir))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a cassette file get an adapter that panics with a clear
    /// message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            git: match replayers.git {
                Some(r) => Box::new(ReplayingGitClient::new(r)),
                None => Box::new(PanickingGitClient),
            },
            comparator: match replayers.comparator {
                Some(r) => Box::new(ReplayingComparator::new(r)),
                None => Box::new(PanickingComparator),
            },
        })
    }
}

fn live_comparator(command: Option<&str>) -> Box<dyn Comparator> {
    match command {
        Some(command) => Box::new(CommandComparator::new(command)),
        None => Box::new(UnconfiguredComparator),
    }
}

/// Stands in for the comparator when no command is configured.
struct UnconfiguredComparator;
impl Comparator for UnconfiguredComparator {
    fn compare(&self, _request: &ComparisonRequest) -> Result<RelationshipGraph, PortError> {
        Err(format!(
            "no comparator configured; set {} or pass --comparator",
            crate::config::ENV_COMPARATOR
        )
        .into())
    }
}

// --- Panicking adapters for ports without a cassette ---

fn missing_cassette(port: &str, name: &str) -> ! {
    panic!(
        "{port} port not configured in CassetteConfig: no cassette loaded for {name}"
    )
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn exists(&self, _path: &Path) -> bool {
        missing_cassette("FileSystem", "fs")
    }
    fn create_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        missing_cassette("FileSystem", "fs")
    }
    fn remove_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        missing_cassette("FileSystem", "fs")
    }
}

struct PanickingGitClient;
impl GitClient for PanickingGitClient {
    fn clone_bare(&self, _: &str, _: &Path, _: HistoryPolicy) -> Result<(), PortError> {
        missing_cassette("GitClient", "git")
    }
    fn fetch_all(&self, _: &Path, _: HistoryPolicy) -> Result<(), PortError> {
        missing_cassette("GitClient", "git")
    }
    fn checkout(&self, _: &Path, _: &str, _: &Path) -> Result<(), PortError> {
        missing_cassette("GitClient", "git")
    }
    fn first_parent(&self, _: &Path, _: &str) -> Result<String, PortError> {
        missing_cassette("GitClient", "git")
    }
    fn tree_diff(&self, _: &Path, _: &str, _: &str) -> Result<Vec<TreeChange>, PortError> {
        missing_cassette("GitClient", "git")
    }
}

struct PanickingComparator;
impl Comparator for PanickingComparator {
    fn compare(&self, _request: &ComparisonRequest) -> Result<RelationshipGraph, PortError> {
        missing_cassette("Comparator", "comparator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_context_without_comparator_reports_configuration() {
        let ctx = ServiceContext::live(None);
        let request = ComparisonRequest::default();
        let err = ctx.comparator.compare(&request).unwrap_err();
        assert!(err.to_string().contains("REFLABEL_COMPARATOR"));
    }

    #[test]
    fn recording_then_replaying_round_trip() {
        let base = tempfile::tempdir().unwrap();
        let marker = base.path().join("marker");

        let base_dir = base.path().to_path_buf();
        let (ctx, session) = ServiceContext::recording_at(base_dir, None).unwrap();
        assert!(!ctx.fs.exists(&marker));
        ctx.fs.create_dir_all(&marker).unwrap();
        assert!(ctx.fs.exists(&marker));
        drop(ctx);
        let dir = session.finish().unwrap();

        let replay = ServiceContext::replaying(&dir).unwrap();
        assert!(!replay.fs.exists(&marker));
        replay.fs.create_dir_all(&marker).unwrap();
        assert!(replay.fs.exists(&marker));
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unspecified_port_panics_with_clear_message() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::default()).unwrap();
        let _ = ctx.git.first_parent(Path::new("/r/p"), "abcdef1");
    }
}
