//! `reflabel batch` command.

use std::path::Path;
use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::evaluate::{run_batch, Evaluator, PairSpec};

use super::render;

/// Concurrency used for a batch.
///
/// Cassettes replay each `port::method` queue in call order, so a batch that
/// is being recorded evaluates one pair at a time.
#[must_use]
pub fn effective_jobs(requested: usize, recording: bool) -> usize {
    if recording {
        1
    } else {
        requested.max(1)
    }
}

/// Execute the `batch` command.
///
/// Failed pairs are reported inside the output; only unreadable input or a
/// runtime that cannot start is an error.
///
/// # Errors
///
/// Returns an error string if the pair file cannot be read or parsed.
pub fn run(
    evaluator: Evaluator,
    file: &Path,
    jobs: usize,
    format: OutputFormat,
) -> Result<String, String> {
    let pairs = load_pairs(file)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;
    let batch = run_batch(Arc::new(evaluator), pairs, jobs);
    let outcomes = runtime.block_on(batch);
    render(&outcomes, format)
}

/// Reads a YAML list of `{project, commit}` entries.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or parsed.
pub fn load_pairs(file: &Path) -> Result<Vec<PairSpec>, String> {
    let contents = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {e}", file.display()))
}
