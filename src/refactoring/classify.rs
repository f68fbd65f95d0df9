//! Relationship-to-refactoring decision table.

use crate::relationship::{ElementKind, RelationshipKind};

use super::RefactoringType;

/// Element kinds grouped the way the decision table distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    /// Class or enum.
    Class,
    /// Interface.
    Interface,
    /// Method.
    Operation,
    /// Never classified.
    Other,
}

impl From<ElementKind> for ElementCategory {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Class | ElementKind::Enum => ElementCategory::Class,
            ElementKind::Interface => ElementCategory::Interface,
            ElementKind::Method => ElementCategory::Operation,
            ElementKind::Field | ElementKind::Other => ElementCategory::Other,
        }
    }
}

use ElementCategory::{Class, Interface, Operation};
use RefactoringType::{
    ExtractInterface, ExtractOperation, ExtractSuperclass, InlineOperation, MoveClass,
    MoveOperation, PullUpOperation, PushDownOperation, RenameClass, RenameMethod,
};

/// Every classifying `(relationship kind, element category)` pair.
/// Pairs not listed classify to nothing.
pub const RULES: &[(RelationshipKind, ElementCategory, RefactoringType)] = &[
    (RelationshipKind::Move, Class, MoveClass),
    (RelationshipKind::Move, Interface, MoveClass),
    (RelationshipKind::Move, Operation, MoveOperation),
    (RelationshipKind::Rename, Class, RenameClass),
    (RelationshipKind::Rename, Interface, RenameClass),
    (RelationshipKind::Rename, Operation, RenameMethod),
    (RelationshipKind::Extract, Operation, ExtractOperation),
    (RelationshipKind::Inline, Operation, InlineOperation),
    (RelationshipKind::PullUp, Operation, PullUpOperation),
    (RelationshipKind::PullUpSignature, Operation, PullUpOperation),
    (RelationshipKind::PushDown, Operation, PushDownOperation),
    (RelationshipKind::PushDownImpl, Operation, PushDownOperation),
    (RelationshipKind::ExtractSuper, Interface, ExtractInterface),
    (RelationshipKind::ExtractSuper, Class, ExtractSuperclass),
];

/// Maps a relationship to its refactoring label.
///
/// Only the after-side element kind is consulted. `SAME` and every pair
/// missing from [`RULES`] return `None`.
#[must_use]
pub fn classify(
    kind: RelationshipKind,
    _before: ElementKind,
    after: ElementKind,
) -> Option<RefactoringType> {
    let category = ElementCategory::from(after);
    RULES
        .iter()
        .find(|(rule_kind, rule_category, _)| *rule_kind == kind && *rule_category == category)
        .map(|(_, _, label)| *label)
}
