//! End-to-end run against a throwaway git repository with the live adapters.
//!
//! Skipped when `git` is not installed.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use reflabel::adapters::live::LiveGitClient;
use reflabel::config::EvalConfig;
use reflabel::context::ServiceContext;
use reflabel::evaluate::Evaluator;
use reflabel::ports::GitClient;
use reflabel::project::{CommitId, Project};
use reflabel::refactoring::RefactoringType;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

fn git(repo: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "commit.gpgsign=false"])
        .args(["-c", "init.defaultBranch=main"])
        .args(args)
        .current_dir(repo)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("failed to run git");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "git {args:?}: {stderr}");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn write(repo: &Path, path: &str, contents: &str) {
    let file = repo.join(path);
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(file, contents).unwrap();
}

/// Two commits: the second moves `Foo.java` and edits `Bar.java`.
fn origin(dir: &Path) -> String {
    git(dir, &["init", "-q"]);
    write(
        dir,
        "src/a/Foo.java",
        "package a;\n\npublic class Foo {\n    int size() { return 0; }\n}\n",
    );
    write(dir, "src/a/Bar.java", "package a;\n\npublic class Bar {}\n");
    write(dir, "README.md", "sample\n");
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "initial"]);

    std::fs::create_dir_all(dir.join("src/b")).unwrap();
    git(dir, &["mv", "src/a/Foo.java", "src/b/Foo.java"]);
    write(
        dir,
        "src/a/Bar.java",
        "package a;\n\npublic class Bar {\n    void run() {}\n}\n",
    );
    write(dir, "README.md", "sample, edited\n");
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "move Foo"]);
    git(dir, &["rev-parse", "HEAD"])
}

const GRAPH: &str = concat!(
    r#"{"relationships":[{"kind":"MOVE","#,
    r#""before":{"kind":"class","key":"a.Foo"},"#,
    r#""after":{"kind":"class","key":"b.Foo"},"similarity":0.92}]}"#,
);

#[test]
fn evaluates_a_real_commit() {
    if !git_available() {
        eprintln!("git not installed; skipping");
        return;
    }
    let upstream = tempfile::tempdir().unwrap();
    let repo = upstream.path().join("origin");
    std::fs::create_dir_all(&repo).unwrap();
    let head = origin(&repo);

    let workspace = tempfile::tempdir().unwrap();
    let request_log = workspace.path().join("request.json");
    let comparator = format!("cat > '{}'; echo '{GRAPH}'", request_log.display());
    let config = EvalConfig {
        root: workspace.path().join("root"),
        comparator: Some(comparator),
        ..EvalConfig::default()
    };
    let ctx = ServiceContext::live(config.comparator.as_deref());
    let evaluator = Evaluator::new(Arc::new(ctx), &config);

    let reference = format!("file://{}", repo.display());
    let project = Project::parse(&reference).unwrap();
    let commit = CommitId::parse(&head).unwrap();
    let set = evaluator.evaluate(&project, &commit).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.entries()[0].kind, RefactoringType::MoveClass);

    // Both snapshots are materialized from the bare mirror.
    let provisioner = evaluator.provisioner();
    let snapshots = provisioner.layout().snapshots(&project, &commit);
    assert!(snapshots.before.join("src/a/Foo.java").exists());
    assert!(!snapshots.before.join("src/b/Foo.java").exists());
    assert!(snapshots.after.join("src/b/Foo.java").exists());
    assert!(workspace.path().join("root/origin").is_dir());

    // Only Java files reach the comparator, with the rename as a hint.
    let raw = std::fs::read_to_string(&request_log).unwrap();
    let request: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let paths = |side: &str| -> Vec<String> {
        request[side]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["path"].as_str().unwrap().to_string())
            .collect()
    };
    let mut before = paths("before");
    before.sort();
    let mut after = paths("after");
    after.sort();
    assert_eq!(before, vec!["src/a/Bar.java", "src/a/Foo.java"]);
    assert_eq!(after, vec!["src/a/Bar.java", "src/b/Foo.java"]);
    assert_eq!(request["rename_hints"]["src/a/Foo.java"], "src/b/Foo.java");

    // A second run reuses the checkouts.
    let again = evaluator.evaluate(&project, &commit).unwrap();
    assert_eq!(again, set);
}

#[test]
fn root_commit_reports_a_missing_first_parent() {
    if !git_available() {
        eprintln!("git not installed; skipping");
        return;
    }
    let upstream = tempfile::tempdir().unwrap();
    let repo = upstream.path();
    origin(repo);
    let root = git(repo, &["rev-list", "--max-parents=0", "HEAD"]);
    let mirror = repo.join(".git");

    let err = LiveGitClient.first_parent(&mirror, &root).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("no first parent of"), "{message}");
    assert!(!message.trim_end().ends_with(':'), "{message}");
}
