//! Live comparator adapter that runs an external command.
//!
//! The command receives a JSON [`ComparisonRequest`] on stdin and must print
//! a JSON [`RelationshipGraph`] on stdout.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::PortError;
use crate::ports::comparator::Comparator;
use crate::relationship::{ComparisonRequest, RelationshipGraph};

/// Runs a comparator command through the system shell.
pub struct CommandComparator {
    command: String,
}

impl CommandComparator {
    /// Creates an adapter for the given shell command line.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Comparator for CommandComparator {
    fn compare(&self, request: &ComparisonRequest) -> Result<RelationshipGraph, PortError> {
        let payload = serde_json::to_vec(request)?;
        debug!(
            command = %self.command,
            before = request.before.len(),
            after = request.after.len(),
            "running comparator"
        );

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child.stdin.take().ok_or("comparator stdin unavailable")?;
        let writer = std::thread::spawn(move || stdin.write_all(&payload));
        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| "comparator stdin writer panicked")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "comparator command {:?} failed ({}): {}",
                self.command,
                output.status,
                stderr.trim()
            )
            .into());
        }
        match written {
            // The command may answer without consuming the whole request.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(command = %self.command, "comparator closed stdin early");
            }
            other => other?,
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| format!("comparator produced invalid output: {e}").into())
    }
}
