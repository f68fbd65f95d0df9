//! Live git adapter using `git` CLI commands.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::PortError;
use crate::ports::git::{GitClient, HistoryPolicy, TreeChange};

/// Live git adapter that shells out to the `git` CLI.
pub struct LiveGitClient;

/// Runs `git` with the given arguments and returns its stdout.
fn run_git(cwd: Option<&Path>, args: &[OsString]) -> Result<String, PortError> {
    let mut command = Command::new("git");
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    command.args(args);
    debug!(args = ?args, "running git");

    let output = command.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let verb = args
            .iter()
            .map(|a| a.to_string_lossy())
            .find(|a| !a.starts_with('-'))
            .unwrap_or_default()
            .into_owned();
        return Err(failure_message(&verb, output.status, &stderr).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn failure_message(verb: &str, status: impl fmt::Display, stderr: &str) -> String {
    match stderr.trim() {
        "" => format!("git {verb} failed ({status}) without diagnostics"),
        reason => format!("git {verb} failed ({status}): {reason}"),
    }
}

fn git_dir_arg(mirror: &Path) -> OsString {
    let mut arg = OsString::from("--git-dir=");
    arg.push(mirror);
    arg
}

impl GitClient for LiveGitClient {
    fn clone_bare(
        &self,
        remote: &str,
        mirror: &Path,
        history: HistoryPolicy,
    ) -> Result<(), PortError> {
        if let Some(parent) = mirror.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let args: Vec<OsString> = vec![
            "clone".into(),
            "--bare".into(),
            history.git_arg().into(),
            remote.into(),
            mirror.into(),
        ];
        run_git(mirror.parent(), &args).map(|_| ())
    }

    fn fetch_all(&self, mirror: &Path, history: HistoryPolicy) -> Result<(), PortError> {
        let args: Vec<OsString> = vec![
            git_dir_arg(mirror),
            "fetch".into(),
            "--prune".into(),
            history.git_arg().into(),
            "origin".into(),
            "+refs/heads/*:refs/heads/*".into(),
            "+refs/tags/*:refs/tags/*".into(),
        ];
        run_git(None, &args).map(|_| ())
    }

    fn checkout(&self, mirror: &Path, revision: &str, work_tree: &Path) -> Result<(), PortError> {
        let mut work_tree_arg = OsString::from("--work-tree=");
        work_tree_arg.push(work_tree);
        let args: Vec<OsString> = vec![
            git_dir_arg(mirror),
            work_tree_arg,
            "checkout".into(),
            revision.into(),
            "--".into(),
            ".".into(),
        ];
        run_git(None, &args).map(|_| ())
    }

    fn first_parent(&self, mirror: &Path, commit: &str) -> Result<String, PortError> {
        let args: Vec<OsString> = vec![
            git_dir_arg(mirror),
            "rev-parse".into(),
            "--verify".into(),
            format!("{commit}^1").into(),
        ];
        let parent = run_git(None, &args)
            .map_err(|e| format!("no first parent of {commit} in mirror: {e}"))?
            .trim()
            .to_string();
        if parent.is_empty() {
            return Err(format!("{commit} has no first parent").into());
        }
        Ok(parent)
    }

    fn tree_diff(
        &self,
        mirror: &Path,
        old: &str,
        new: &str,
    ) -> Result<Vec<TreeChange>, PortError> {
        let args: Vec<OsString> = vec![
            git_dir_arg(mirror),
            "diff-tree".into(),
            "-r".into(),
            "-M".into(),
            "-z".into(),
            "--name-status".into(),
            old.into(),
            new.into(),
        ];
        let raw = run_git(None, &args)?;
        parse_name_status(&raw)
    }
}

/// Parses NUL-separated `git diff-tree --name-status -z` output.
///
/// Copies are reported as additions of the destination; type changes as
/// modifications. Unmerged and unknown entries are skipped.
///
/// # Errors
///
/// Returns an error when a status is not followed by its path(s).
pub fn parse_name_status(raw: &str) -> Result<Vec<TreeChange>, PortError> {
    let mut fields = raw.split('\0').filter(|f| !f.is_empty());
    let mut changes = Vec::new();

    while let Some(status) = fields.next() {
        let mut path = || {
            fields
                .next()
                .map(str::to_string)
                .ok_or_else(|| format!("truncated diff-tree output after status {status:?}"))
        };
        let change = match status.chars().next() {
            Some('A') => Some(TreeChange::Added { path: path()? }),
            Some('D') => Some(TreeChange::Removed { path: path()? }),
            Some('M' | 'T') => Some(TreeChange::Modified { path: path()? }),
            Some('R') => {
                let from = path()?;
                let to = path()?;
                Some(TreeChange::Renamed { from, to })
            }
            Some('C') => {
                let _source = path()?;
                Some(TreeChange::Added { path: path()? })
            }
            _ => {
                let _ = path()?;
                None
            }
        };
        changes.extend(change);
    }
    Ok(changes)
}
