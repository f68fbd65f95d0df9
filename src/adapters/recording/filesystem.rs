//! Recording adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::FileSystem;

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a Path,
}

impl FileSystem for RecordingFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        let input = PathInput { path };
        record_interaction(&self.recorder, "fs", "exists", &input, &result);
        result
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        let result = self.inner.create_dir_all(path);
        let input = PathInput { path };
        record_result(&self.recorder, "fs", "create_dir_all", &input, &result);
        result
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), PortError> {
        let result = self.inner.remove_dir_all(path);
        let input = PathInput { path };
        record_result(&self.recorder, "fs", "remove_dir_all", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;

    #[test]
    fn records_exists_and_create_interactions() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("fs.cassette.yaml");
        let target = dir.path().join("v1").join("proj-abcdef1");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        // Scope the adapter so it's dropped before we try to unwrap
        {
            let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder));
            assert!(!fs.exists(&target));
            fs.create_dir_all(&target).unwrap();
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        assert!(content.contains("exists"));
        assert!(content.contains("create_dir_all"));
        assert!(content.contains("proj-abcdef1"));
    }
}
