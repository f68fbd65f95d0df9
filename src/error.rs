//! Typed errors for the evaluation pipeline.
//!
//! Port traits report failures as boxed errors; the components that call
//! them wrap those failures into the enums below so callers can tell a
//! recoverable provisioning problem from a fatal one.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned across port boundaries.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Invalid project reference or commit identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    /// The reference has no usable final path segment.
    #[error("cannot derive a repository folder from project reference {0:?}")]
    EmptyFolder(String),
    /// The commit id is too short or not hexadecimal.
    #[error("invalid commit id {0:?}: expected at least 7 hexadecimal characters")]
    InvalidCommit(String),
}

/// Failure while materializing the mirror or a snapshot checkout.
///
/// Recoverable: the pipeline logs it and carries on with whatever exists
/// on disk.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// `git clone` of a missing mirror failed.
    #[error("failed to clone {remote} into {}: {source}", mirror.display())]
    Clone {
        /// Remote repository reference.
        remote: String,
        /// Mirror path that was being created.
        mirror: PathBuf,
        /// Underlying git failure.
        source: PortError,
    },
    /// `git fetch` of an existing mirror failed.
    #[error("failed to fetch into {}: {source}", mirror.display())]
    Fetch {
        /// Mirror path that was being refreshed.
        mirror: PathBuf,
        /// Underlying git failure.
        source: PortError,
    },
    /// The checkout directory could not be created.
    #[error("failed to create checkout directory {}: {source}", dir.display())]
    CreateDir {
        /// Directory that could not be created.
        dir: PathBuf,
        /// Underlying filesystem failure.
        source: PortError,
    },
    /// `git checkout` into a work tree failed.
    #[error("failed to check out {revision} into {}: {source}", dir.display())]
    Checkout {
        /// Revision being checked out.
        revision: String,
        /// Target work tree.
        dir: PathBuf,
        /// Underlying git failure.
        source: PortError,
    },
}

/// Failure while computing the file sets of a commit.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The first parent of the commit could not be resolved.
    #[error("cannot resolve the parent of {commit}: {source}")]
    Parent {
        /// Commit whose parent was requested.
        commit: String,
        /// Underlying git failure.
        source: PortError,
    },
    /// The tree diff between parent and commit failed.
    #[error("cannot diff {parent}..{commit}: {source}")]
    TreeDiff {
        /// Parent commit.
        parent: String,
        /// Target commit.
        commit: String,
        /// Underlying git failure.
        source: PortError,
    },
}

/// The structural comparator failed to produce a relationship graph.
#[derive(Debug, Error)]
#[error("comparator failed: {0}")]
pub struct ComparatorError(#[source] pub PortError);

/// Fatal failure while evaluating one project/commit pair.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The file sets could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// The comparator call failed.
    #[error(transparent)]
    Comparator(#[from] ComparatorError),
}

/// Invalid configuration value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable or flag held a value that could not be parsed.
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        /// Variable or flag name.
        name: String,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_error_names_the_paths() {
        let err = ProvisionError::Fetch {
            mirror: PathBuf::from("/tmp/root/jabref"),
            source: "exit status 128".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/root/jabref"));
        assert!(msg.contains("exit status 128"));
    }

    #[test]
    fn eval_error_is_transparent() {
        let err: EvalError = ComparatorError("boom".into()).into();
        assert_eq!(err.to_string(), "comparator failed: boom");
    }
}
