//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn exists(&self, _path: &Path) -> bool {
        let output = next_output(&self.replayer, "fs", "exists");
        output
            .as_bool()
            .expect("fs::exists: expected boolean output")
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "fs", "create_dir_all");
        replay_result(&output, "fs::create_dir_all")
    }

    fn remove_dir_all(&self, _path: &Path) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "fs", "remove_dir_all");
        replay_result(&output, "fs::remove_dir_all")
    }
}
