//! `reflabel files` command.

use crate::cli::{OutputFormat, PairArgs};
use crate::evaluate::Evaluator;

use super::{parse_pair, render};

/// Execute the `files` command.
///
/// Provisions the pair first so the mirror holds the commit, then prints
/// the resolved file sets.
///
/// # Errors
///
/// Returns an error string if the pair is malformed or resolution fails.
pub fn run(
    evaluator: &Evaluator,
    pair: &PairArgs,
    format: OutputFormat,
) -> Result<String, String> {
    let (project, commit) = parse_pair(pair)?;
    let provisioner = evaluator.provisioner();
    provisioner.ensure_snapshots(&project, &commit);
    let mirror = provisioner.layout().mirror(&project);
    let sets = evaluator
        .resolver()
        .resolve(&mirror, &commit)
        .map_err(|e| e.to_string())?;
    render(&sets, format)
}
