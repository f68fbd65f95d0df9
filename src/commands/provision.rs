//! `reflabel provision` command.

use crate::cli::PairArgs;
use crate::evaluate::Evaluator;

use super::parse_pair;

/// Execute the `provision` command.
///
/// Unlike the evaluation pipeline, a provisioning failure is an error here.
///
/// # Errors
///
/// Returns an error string if the pair is malformed or a git step fails.
pub fn run(evaluator: &Evaluator, pair: &PairArgs) -> Result<String, String> {
    let (project, commit) = parse_pair(pair)?;
    let snapshots = evaluator
        .provisioner()
        .try_ensure_snapshots(&project, &commit)
        .map_err(|e| e.to_string())?;
    Ok(format!(
        "before: {}\nafter: {}\n",
        snapshots.before.display(),
        snapshots.after.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::replaying::test_support::replayer;
    use crate::adapters::replaying::{ReplayingComparator, ReplayingFileSystem, ReplayingGitClient};
    use crate::config::EvalConfig;
    use crate::context::ServiceContext;
    use serde_json::json;

    fn evaluator(fs: Vec<serde_json::Value>, git: Vec<(&str, serde_json::Value)>) -> Evaluator {
        let fs = fs
            .into_iter()
            .map(|o| {
                let method = if o.is_boolean() {
                    "exists"
                } else {
                    "create_dir_all"
                };
                ("fs", method, o)
            })
            .collect();
        let fs = replayer(fs);
        let git = replayer(git.into_iter().map(|(m, o)| ("git", m, o)).collect());
        let ctx = ServiceContext::new(
            Box::new(ReplayingFileSystem::new(fs)),
            Box::new(ReplayingGitClient::new(git)),
            Box::new(ReplayingComparator::new(replayer(vec![]))),
        );
        let config = EvalConfig {
            root: "/work".into(),
            ..EvalConfig::default()
        };
        Evaluator::new(Arc::new(ctx), &config)
    }

    fn pair() -> PairArgs {
        PairArgs {
            project: "git@github.com:square/okhttp.git".into(),
            commit: "C0FFEE1234".into(),
        }
    }

    #[test]
    fn prints_both_snapshot_paths() {
        let evaluator = evaluator(vec![json!(true), json!(true)], vec![]);
        let out = run(&evaluator, &pair()).unwrap();
        assert_eq!(
            out,
            "before: /work/v0/okhttp-c0ffee1\nafter: /work/v1/okhttp-c0ffee1\n"
        );
    }

    #[test]
    fn fetch_failure_is_an_error() {
        let evaluator = evaluator(
            vec![json!(false), json!(true), json!(true)],
            vec![("fetch_all", json!({"err": "connection reset"}))],
        );
        let err = run(&evaluator, &pair()).unwrap_err();
        assert!(err.contains("connection reset"));
    }
}
