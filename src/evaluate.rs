//! The evaluation pipeline for one pair, and the batch runner for many.
//!
//! provision snapshots → resolve file sets → compare → classify → accumulate

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{EvalConfig, SourceFilter};
use crate::context::ServiceContext;
use crate::error::{ComparatorError, EvalError};
use crate::ports::git::HistoryPolicy;
use crate::project::{CommitId, Project, WorkspaceLayout};
use crate::provision::{ProjectLocks, SnapshotProvisioner};
use crate::refactoring::{classify, RefactoringSet};
use crate::relationship::{ComparisonRequest, RelationshipGraph, SourceFile};
use crate::resolve::FileSetResolver;

/// Runs the pipeline against one workspace.
///
/// Cheap to share: batch workers hold it behind an `Arc`.
pub struct Evaluator {
    ctx: Arc<ServiceContext>,
    layout: WorkspaceLayout,
    history: HistoryPolicy,
    filter: SourceFilter,
    locks: Arc<ProjectLocks>,
}

impl Evaluator {
    /// Creates an evaluator from a context and a configuration.
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, config: &EvalConfig) -> Self {
        Self {
            ctx,
            layout: WorkspaceLayout::new(&config.root),
            history: config.history,
            filter: config.source_filter.clone(),
            locks: Arc::new(ProjectLocks::new()),
        }
    }

    /// Provisioner bound to this evaluator's workspace and locks.
    #[must_use]
    pub fn provisioner(&self) -> SnapshotProvisioner<'_> {
        SnapshotProvisioner::new(
            &self.ctx,
            self.layout.clone(),
            self.history,
            Arc::clone(&self.locks),
        )
    }

    /// Resolver bound to this evaluator's source filter.
    #[must_use]
    pub fn resolver(&self) -> FileSetResolver<'_> {
        FileSetResolver::new(&self.ctx, self.filter.clone())
    }

    /// Labels the refactorings of one commit.
    ///
    /// Provisioning failures are logged and tolerated; the comparator then
    /// sees whatever the checkouts contain.
    ///
    /// # Errors
    ///
    /// Returns an error if the file sets cannot be resolved or the
    /// comparator fails.
    pub fn evaluate(
        &self,
        project: &Project,
        commit: &CommitId,
    ) -> Result<RefactoringSet, EvalError> {
        let mut set = RefactoringSet::new(project.reference(), commit.as_str());

        let snapshots = self.provisioner().ensure_snapshots(project, commit);
        let mirror = self.layout.mirror(project);
        let files = self.resolver().resolve(&mirror, commit)?;

        let request = ComparisonRequest {
            before: SourceFile::under(&snapshots.before, &files.before),
            after: SourceFile::under(&snapshots.after, &files.after),
            rename_hints: files.rename_hints,
        };
        info!(%project, %commit, "computing diff");
        let graph = self
            .ctx
            .comparator
            .compare(&request)
            .map_err(ComparatorError)?;

        let added = accumulate(&mut set, &graph);
        info!(
            %project,
            commit = commit.short(),
            relationships = graph.relationships.len(),
            refactorings = added,
            "classified relationships"
        );
        Ok(set)
    }
}

/// Classifies every relationship of `graph` and appends the hits to `set`.
///
/// Returns how many entries were added.
pub fn accumulate(set: &mut RefactoringSet, graph: &RelationshipGraph) -> usize {
    let start = set.len();
    for rel in &graph.relationships {
        match classify(rel.kind, rel.before.kind, rel.after.kind) {
            Some(kind) => set.add(kind, &rel.before.key, &rel.after.key, rel.similarity),
            None => debug!(
                kind = ?rel.kind,
                element = ?rel.after.kind,
                key = %rel.after.key,
                "not a refactoring"
            ),
        }
    }
    set.len() - start
}

/// One line of a batch input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSpec {
    /// Remote repository reference.
    pub project: String,
    /// Commit hash.
    pub commit: String,
}

/// Result of one pair in a batch. A failed pair carries an error and the
/// (empty) set it had accumulated.
#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    /// Remote repository reference.
    pub project: String,
    /// Commit hash.
    pub commit: String,
    /// Labeled refactorings.
    pub refactorings: RefactoringSet,
    /// Why the pair failed, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PairOutcome {
    /// `true` when the pair completed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn failed(spec: &PairSpec, error: String) -> Self {
        Self {
            project: spec.project.clone(),
            commit: spec.commit.clone(),
            refactorings: RefactoringSet::new(&spec.project, &spec.commit),
            error: Some(error),
        }
    }
}

/// Evaluates one pair, turning every failure into an outcome.
#[must_use]
pub fn evaluate_pair(evaluator: &Evaluator, spec: &PairSpec) -> PairOutcome {
    let parsed = Project::parse(&spec.project)
        .and_then(|project| CommitId::parse(&spec.commit).map(|commit| (project, commit)));
    let (project, commit) = match parsed {
        Ok(pair) => pair,
        Err(err) => return PairOutcome::failed(spec, err.to_string()),
    };

    match evaluator.evaluate(&project, &commit) {
        Ok(refactorings) => PairOutcome {
            project: spec.project.clone(),
            commit: spec.commit.clone(),
            refactorings,
            error: None,
        },
        Err(err) => {
            warn!(project = %spec.project, commit = %spec.commit, error = %err, "pair failed");
            PairOutcome::failed(spec, err.to_string())
        }
    }
}

/// Evaluates many pairs, at most `jobs` at a time, and returns the outcomes
/// in input order. No pair's failure stops the others.
pub async fn run_batch(
    evaluator: Arc<Evaluator>,
    pairs: Vec<PairSpec>,
    jobs: usize,
) -> Vec<PairOutcome> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, spec) in pairs.iter().cloned().enumerate() {
        let evaluator = Arc::clone(&evaluator);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let job = spec.clone();
            let worker = tokio::task::spawn_blocking(move || evaluate_pair(&evaluator, &job));
            let outcome = match worker.await {
                Ok(outcome) => outcome,
                Err(e) => PairOutcome::failed(&spec, format!("worker panicked: {e}")),
            };
            (index, outcome)
        });
    }

    let mut outcomes: Vec<Option<PairOutcome>> = vec![None; pairs.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(e) => warn!(error = %e, "batch task aborted"),
        }
    }

    let failed = outcomes.iter().flatten().filter(|o| !o.is_ok()).count();
    info!(pairs = pairs.len(), failed, "batch finished");

    outcomes
        .into_iter()
        .zip(&pairs)
        .map(|(outcome, spec)| {
            outcome.unwrap_or_else(|| PairOutcome::failed(spec, "task aborted".to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refactoring::RefactoringType;
    use crate::relationship::ElementKind::{Class, Field, Method};
    use crate::relationship::RelationshipKind::{Move, PushDownImpl, Same};
    use crate::relationship::{ElementKind, Node, Relationship, RelationshipKind};

    fn rel(
        kind: RelationshipKind,
        element: ElementKind,
        before: &str,
        after: &str,
        sim: f64,
    ) -> Relationship {
        Relationship {
            kind,
            before: Node::new(element, before),
            after: Node::new(element, after),
            similarity: sim,
        }
    }

    #[test]
    fn accumulate_drops_unclassified_and_keeps_similarity() {
        let graph = RelationshipGraph {
            relationships: vec![
                rel(Same, Method, "a.A#m()", "a.A#m()", 1.0),
                rel(Move, Class, "a.Foo", "b.Foo", 0.92),
                rel(Move, Field, "a.Foo.x", "b.Foo.x", 0.9),
                rel(PushDownImpl, Method, "a.A#m()", "a.B#m()", 0.734_512),
            ],
        };
        let mut set = RefactoringSet::new("p", "c");
        assert_eq!(accumulate(&mut set, &graph), 2);

        assert_eq!(set.entries()[0].kind, RefactoringType::MoveClass);
        let pushed = &set.entries()[1];
        assert_eq!(pushed.kind, RefactoringType::PushDownOperation);
        assert_eq!(pushed.similarity.to_bits(), 0.734_512_f64.to_bits());
    }

    #[test]
    fn invalid_pair_becomes_failed_outcome() {
        let ctx = Arc::new(ServiceContext::live(None));
        let evaluator = Evaluator::new(ctx, &EvalConfig::default());
        let outcome = evaluate_pair(
            &evaluator,
            &PairSpec {
                project: "https://github.com/x/y.git".into(),
                commit: "nothex".into(),
            },
        );
        assert!(!outcome.is_ok());
        assert!(outcome.refactorings.is_empty());
        assert!(outcome.error.unwrap().contains("invalid commit id"));
    }
}
