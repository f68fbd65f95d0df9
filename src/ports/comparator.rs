//! Structural comparator port.

use crate::error::PortError;
use crate::relationship::{ComparisonRequest, RelationshipGraph};

/// Computes relationships between the elements of two file sets.
///
/// The call blocks until the complete graph is available.
pub trait Comparator: Send + Sync {
    /// Compares the before and after file sets of a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the comparator cannot process the files.
    fn compare(&self, request: &ComparisonRequest) -> Result<RelationshipGraph, PortError>;
}
