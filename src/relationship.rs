//! Relationship graph exchanged with the structural comparator.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of association the comparator found between two elements.
///
/// Strings outside the known vocabulary deserialize as [`RelationshipKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    /// Identity match.
    Same,
    /// Type changed kind (e.g. class to interface).
    ConvertType,
    /// Operation signature changed.
    ChangeSignature,
    /// Member moved to a supertype.
    PullUp,
    /// Only the signature moved to a supertype.
    PullUpSignature,
    /// Member moved to a subtype.
    PushDown,
    /// Implementation moved to a subtype.
    PushDownImpl,
    /// Element moved to another container.
    Move,
    /// Element renamed.
    Rename,
    /// Element moved and renamed.
    MoveRename,
    /// New supertype extracted.
    ExtractSuper,
    /// New operation extracted.
    Extract,
    /// New operation extracted into another container.
    ExtractMove,
    /// Operation inlined.
    Inline,
    /// Anything the comparator reports that is not listed above.
    #[serde(other)]
    Unknown,
}

impl RelationshipKind {
    /// Every kind, in declaration order.
    pub const ALL: [RelationshipKind; 15] = [
        RelationshipKind::Same,
        RelationshipKind::ConvertType,
        RelationshipKind::ChangeSignature,
        RelationshipKind::PullUp,
        RelationshipKind::PullUpSignature,
        RelationshipKind::PushDown,
        RelationshipKind::PushDownImpl,
        RelationshipKind::Move,
        RelationshipKind::Rename,
        RelationshipKind::MoveRename,
        RelationshipKind::ExtractSuper,
        RelationshipKind::Extract,
        RelationshipKind::ExtractMove,
        RelationshipKind::Inline,
        RelationshipKind::Unknown,
    ];
}

/// Syntactic category of a code element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Class declaration.
    Class,
    /// Enum declaration.
    Enum,
    /// Interface declaration.
    Interface,
    /// Method declaration.
    Method,
    /// Field declaration.
    Field,
    /// Any other element.
    #[serde(other)]
    Other,
}

impl ElementKind {
    /// Every kind, in declaration order.
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Class,
        ElementKind::Enum,
        ElementKind::Interface,
        ElementKind::Method,
        ElementKind::Field,
        ElementKind::Other,
    ];
}

/// One endpoint of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Element kind.
    pub kind: ElementKind,
    /// Unique key, e.g. a fully qualified name.
    pub key: String,
}

impl Node {
    /// Creates a node.
    pub fn new(kind: ElementKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

/// A scored association between a before-element and an after-element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship kind.
    pub kind: RelationshipKind,
    /// Element in the before-snapshot.
    pub before: Node,
    /// Element in the after-snapshot.
    pub after: Node,
    /// Similarity in `[0, 1]`.
    pub similarity: f64,
}

/// Everything the comparator returns for one pair of file sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    /// Relationships in the order the comparator reported them.
    pub relationships: Vec<Relationship>,
}

/// A path inside a snapshot, paired with that snapshot's root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Snapshot checkout directory.
    pub root: PathBuf,
    /// Path relative to `root`.
    pub path: String,
}

impl SourceFile {
    /// Pairs every path with the same root.
    pub fn under(root: &std::path::Path, paths: &[String]) -> Vec<SourceFile> {
        paths
            .iter()
            .map(|p| SourceFile {
                root: root.to_path_buf(),
                path: p.clone(),
            })
            .collect()
    }
}

/// Input handed to the comparator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Files of the before-snapshot.
    pub before: Vec<SourceFile>,
    /// Files of the after-snapshot.
    pub after: Vec<SourceFile>,
    /// Old path to new path for renamed files.
    pub rename_hints: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comparator_output() {
        let json = r#"{"relationships":[
            {"kind":"PULL_UP_SIGNATURE",
             "before":{"kind":"method","key":"a.B#m()"},
             "after":{"kind":"method","key":"a.A#m()"},
             "similarity":0.81}]}"#;
        let graph: RelationshipGraph = serde_json::from_str(json).unwrap();
        let rel = &graph.relationships[0];
        assert_eq!(rel.kind, RelationshipKind::PullUpSignature);
        assert_eq!(rel.after, Node::new(ElementKind::Method, "a.A#m()"));
        assert!((rel.similarity - 0.81).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_vocabulary_maps_to_catch_all() {
        let rel: Relationship = serde_json::from_str(
            r#"{"kind":"SPLIT","before":{"kind":"field","key":"x"},
                "after":{"kind":"annotation","key":"y"},"similarity":0.5}"#,
        )
        .unwrap();
        assert_eq!(rel.kind, RelationshipKind::Unknown);
        assert_eq!(rel.after.kind, ElementKind::Other);
    }
}
