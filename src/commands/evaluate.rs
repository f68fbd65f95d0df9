//! `reflabel evaluate` command.

use crate::cli::{OutputFormat, PairArgs};
use crate::evaluate::Evaluator;

use super::{parse_pair, render};

/// Execute the `evaluate` command and return the rendered refactoring set.
///
/// # Errors
///
/// Returns an error string if the pair is malformed or the evaluation fails.
pub fn run(
    evaluator: &Evaluator,
    pair: &PairArgs,
    format: OutputFormat,
) -> Result<String, String> {
    let (project, commit) = parse_pair(pair)?;
    let set = evaluator
        .evaluate(&project, &commit)
        .map_err(|e| e.to_string())?;
    render(&set, format)
}
