//! Command dispatch and handlers.

pub mod batch;
pub mod evaluate;
pub mod files;
pub mod provision;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command, GlobalArgs, OutputFormat, PairArgs};
use crate::config::{self, EvalConfig, SourceFilter};
use crate::context::ServiceContext;
use crate::evaluate::Evaluator;
use crate::ports::git::HistoryPolicy;
use crate::project::{CommitId, Project};

/// Dispatch a parsed command to its handler.
///
/// When `REFLABEL_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files below that directory.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let mut config = EvalConfig::from_env().map_err(|e| e.to_string())?;
    apply_overrides(&mut config, &cli.global)?;

    let comparator = config.comparator.as_deref();
    let (ctx, session) = if let Ok(path) = env::var(config::ENV_RECORD) {
        let (ctx, session) = ServiceContext::recording_at(PathBuf::from(path), comparator)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(comparator), None)
    };

    let evaluator = Evaluator::new(Arc::new(ctx), &config);
    let recording = session.is_some();
    let result = dispatch_with_evaluator(&cli.command, evaluator, &config, recording);

    // The evaluator has been consumed, so every recorder is released.
    if let Some(session) = session {
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command against an evaluator.
fn dispatch_with_evaluator(
    command: &Command,
    evaluator: Evaluator,
    config: &EvalConfig,
    recording: bool,
) -> Result<(), String> {
    let output = match command {
        Command::Evaluate { pair, format } => evaluate::run(&evaluator, pair, *format)?,
        Command::Provision { pair } => provision::run(&evaluator, pair)?,
        Command::Files { pair, format } => files::run(&evaluator, pair, *format)?,
        Command::Batch { file, jobs, format } => {
            let requested = jobs.unwrap_or(config.jobs);
            let jobs = batch::effective_jobs(requested, recording);
            if jobs < requested {
                info!(requested, "recording a batch evaluates one pair at a time");
            }
            batch::run(evaluator, file, jobs, *format)?
        }
    };
    print!("{output}");
    Ok(())
}

/// Applies command-line flags on top of the environment configuration.
///
/// # Errors
///
/// Returns an error string if a flag value is invalid.
pub fn apply_overrides(config: &mut EvalConfig, global: &GlobalArgs) -> Result<(), String> {
    if let Some(root) = &global.root {
        config.root.clone_from(root);
    }
    if let Some(command) = &global.comparator {
        config.comparator = Some(command.clone());
    }
    if let Some(date) = &global.shallow_since {
        let date = config::parse_date("--shallow-since", date)
            .map_err(|e| e.to_string())?;
        config.history = HistoryPolicy::Since(date);
    }
    if let Some(depth) = global.depth {
        if depth == 0 {
            return Err("--depth must be greater than zero".to_string());
        }
        config.history = HistoryPolicy::Depth(depth);
    }
    if !global.extensions.is_empty() {
        config.source_filter = SourceFilter::new(&global.extensions);
    }
    Ok(())
}

/// Parses the project and commit given on the command line.
///
/// # Errors
///
/// Returns an error string if either value is malformed.
pub fn parse_pair(pair: &PairArgs) -> Result<(Project, CommitId), String> {
    let project = Project::parse(&pair.project).map_err(|e| e.to_string())?;
    let commit = CommitId::parse(&pair.commit).map_err(|e| e.to_string())?;
    Ok((project, commit))
}

/// Serializes command output in the requested format.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("Failed to serialize output: {e}"))
        }
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .map_err(|e| format!("Failed to serialize output: {e}")),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
