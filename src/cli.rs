//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for `reflabel`.
#[derive(Debug, Parser)]
#[command(
    name = "reflabel",
    version,
    about = "Label the refactorings of a commit by comparing its two snapshots"
)]
pub struct Cli {
    /// Settings shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options overriding the `REFLABEL_*` environment.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Workspace root for mirrors and checkouts.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// Shell command of the structural comparator.
    #[arg(long, global = true, value_name = "CMD")]
    pub comparator: Option<String>,
    /// Truncate mirror history at this date.
    #[arg(
        long,
        global = true,
        value_name = "YYYY-MM-DD",
        conflicts_with = "depth"
    )]
    pub shallow_since: Option<String>,
    /// Keep only the last N commits of mirror history.
    #[arg(long, global = true, value_name = "N")]
    pub depth: Option<u32>,
    /// Source file extension to analyze (repeatable).
    #[arg(long = "ext", global = true, value_name = "EXT")]
    pub extensions: Vec<String>,
}

/// One project/commit pair on the command line.
#[derive(Debug, Args)]
pub struct PairArgs {
    /// Remote repository URL.
    #[arg(long)]
    pub project: String,
    /// Commit hash to analyze.
    #[arg(long)]
    pub commit: String,
}

/// Serialization of command output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML document.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Label the refactorings of one commit.
    Evaluate {
        /// Project and commit.
        #[command(flatten)]
        pair: PairArgs,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Materialize the before/after snapshots and print their paths.
    Provision {
        /// Project and commit.
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Print the before/after file sets and rename hints of a commit.
    Files {
        /// Project and commit.
        #[command(flatten)]
        pair: PairArgs,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Evaluate every pair listed in a YAML file.
    Batch {
        /// YAML list of `{project, commit}` entries.
        file: PathBuf,
        /// Pairs evaluated concurrently.
        #[arg(long)]
        jobs: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}
