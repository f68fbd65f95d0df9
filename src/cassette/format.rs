//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name ("git", "fs", "comparator").
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments the port was called with.
    pub input: serde_json::Value,
    /// What the port returned; fallible methods use `{"ok": ..}` / `{"err": ..}`.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Version of the tool that recorded it.
    pub tool_version: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Creates a cassette stamped with the current time and crate version.
    pub fn new(name: impl Into<String>, interactions: Vec<Interaction>) -> Self {
        Self {
            name: name.into(),
            recorded_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            interactions,
        }
    }
}
