//! Ground-truth refactoring labels and the per-commit result set.

pub mod classify;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use classify::{classify, ElementCategory};

/// Closed set of labels a relationship can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefactoringType {
    /// Type moved to another package or container.
    MoveClass,
    /// Operation moved to another type.
    MoveOperation,
    /// Type renamed.
    RenameClass,
    /// Operation renamed.
    RenameMethod,
    /// Operation extracted from another.
    ExtractOperation,
    /// Operation inlined into its callers.
    InlineOperation,
    /// Operation pulled up into a supertype.
    PullUpOperation,
    /// Operation pushed down into subtypes.
    PushDownOperation,
    /// Interface extracted from a type.
    ExtractInterface,
    /// Superclass extracted from a type.
    ExtractSuperclass,
}

impl RefactoringType {
    /// Upper-case label used in ground-truth datasets.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RefactoringType::MoveClass => "MOVE_CLASS",
            RefactoringType::MoveOperation => "MOVE_OPERATION",
            RefactoringType::RenameClass => "RENAME_CLASS",
            RefactoringType::RenameMethod => "RENAME_METHOD",
            RefactoringType::ExtractOperation => "EXTRACT_OPERATION",
            RefactoringType::InlineOperation => "INLINE_OPERATION",
            RefactoringType::PullUpOperation => "PULL_UP_OPERATION",
            RefactoringType::PushDownOperation => "PUSH_DOWN_OPERATION",
            RefactoringType::ExtractInterface => "EXTRACT_INTERFACE",
            RefactoringType::ExtractSuperclass => "EXTRACT_SUPERCLASS",
        }
    }
}

impl fmt::Display for RefactoringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classified refactoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refactoring {
    /// Label.
    #[serde(rename = "type")]
    pub kind: RefactoringType,
    /// Key of the element in the before-snapshot.
    pub key_before: String,
    /// Key of the element in the after-snapshot.
    pub key_after: String,
    /// Similarity reported by the comparator, unmodified.
    pub similarity: f64,
}

/// Ordered, append-only refactorings of one project/commit pair.
///
/// Entries are never merged: two relationships classifying to the same
/// `(type, key_before, key_after)` produce two entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefactoringSet {
    project: String,
    commit: String,
    refactorings: Vec<Refactoring>,
}

impl RefactoringSet {
    /// Creates an empty set for a project and commit.
    pub fn new(project: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            commit: commit.into(),
            refactorings: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn add(
        &mut self,
        kind: RefactoringType,
        key_before: impl Into<String>,
        key_after: impl Into<String>,
        similarity: f64,
    ) {
        self.refactorings.push(Refactoring {
            kind,
            key_before: key_before.into(),
            key_after: key_after.into(),
            similarity,
        });
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Refactoring] {
        &self.refactorings
    }

    /// Project reference.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Commit id.
    #[must_use]
    pub fn commit(&self) -> &str {
        &self.commit
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.refactorings.len()
    }

    /// `true` when nothing was classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refactorings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_order_and_duplicates() {
        let mut set = RefactoringSet::new("https://github.com/x/y.git", "abcdef1234");
        set.add(RefactoringType::RenameMethod, "a.B#f()", "a.B#g()", 0.7);
        set.add(RefactoringType::MoveClass, "a.Foo", "b.Foo", 0.92);
        set.add(RefactoringType::MoveClass, "a.Foo", "b.Foo", 0.92);

        assert_eq!(set.len(), 3);
        assert_eq!(set.entries()[0].kind, RefactoringType::RenameMethod);
        assert_eq!(set.entries()[1], set.entries()[2]);
        assert_eq!(set.project(), "https://github.com/x/y.git");
        assert_eq!(set.commit(), "abcdef1234");
    }

    #[test]
    fn serializes_with_ground_truth_labels() {
        let mut set = RefactoringSet::new("p", "c");
        set.add(RefactoringType::PullUpOperation, "a.B#m()", "a.A#m()", 0.81);
        let yaml = serde_yaml::to_string(&set).unwrap();
        assert!(yaml.contains("type: PULL_UP_OPERATION"));
        assert!(yaml.contains("similarity: 0.81"));
        let label = RefactoringType::ExtractSuperclass.to_string();
        assert_eq!(label, "EXTRACT_SUPERCLASS");
    }
}
