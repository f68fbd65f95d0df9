//! Replaying adapters that replay recorded interactions.

pub mod comparator;
pub mod filesystem;
pub mod git;

pub use comparator::ReplayingComparator;
pub use filesystem::ReplayingFileSystem;
pub use git::ReplayingGitClient;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;

/// Takes the output of the next `port::method` interaction.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Turns a recorded `{"ok": v}` / `{"err": msg}` output back into a `Result`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;

    /// Replayer over `(port, method, output)` triples.
    pub fn replayer(entries: Vec<(&str, &str, serde_json::Value)>) -> CassetteReplayer {
        let interactions = entries
            .into_iter()
            .enumerate()
            .map(|(seq, (port, method, output))| Interaction {
                seq: seq as u64,
                port: port.into(),
                method: method.into(),
                input: serde_json::json!({}),
                output,
            })
            .collect();
        CassetteReplayer::new(&Cassette::new("test", interactions))
    }
}
