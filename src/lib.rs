//! Core library entry for the `reflabel` CLI.
//!
//! Given a repository and a commit, `reflabel` materializes the commit and
//! its first parent as two snapshots, hands the changed source files to a
//! structural comparator, and labels the relationships it reports with a
//! closed set of refactoring types.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluate;
pub mod ports;
pub mod project;
pub mod provision;
pub mod refactoring;
pub mod relationship;
pub mod resolve;

use clap::error::ErrorKind::{DisplayHelp, DisplayVersion};
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// `--help` and `--version` print to stdout and succeed.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), DisplayHelp | DisplayVersion) => {
            err.print().map_err(|e| e.to_string())?;
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["reflabel", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_and_version_succeed() {
        assert!(run(["reflabel", "--help"]).is_ok());
        assert!(run(["reflabel", "evaluate", "--help"]).is_ok());
        assert!(run(["reflabel", "--version"]).is_ok());
    }

    #[test]
    fn run_rejects_malformed_commit_before_any_work() {
        let result = run([
            "reflabel",
            "provision",
            "--project",
            "https://github.com/a/b",
            "--commit",
            "xyz",
        ]);
        assert!(result.unwrap_err().contains("invalid commit id"));
    }
}
