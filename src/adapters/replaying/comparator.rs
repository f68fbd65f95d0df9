//! Replaying adapter for the `Comparator` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::Comparator;
use crate::relationship::{ComparisonRequest, RelationshipGraph};

/// Replays recorded comparator results from a cassette.
pub struct ReplayingComparator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingComparator {
    /// Creates a new replaying comparator from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl Comparator for ReplayingComparator {
    fn compare(&self, _request: &ComparisonRequest) -> Result<RelationshipGraph, PortError> {
        let output = next_output(&self.replayer, "comparator", "compare");
        replay_result(&output, "comparator::compare")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::replaying::test_support::replayer;
    use crate::relationship::RelationshipKind;
    use serde_json::json;

    #[test]
    fn replaying_compare() {
        let comparator = ReplayingComparator::new(replayer(vec![(
            "comparator",
            "compare",
            json!({"ok": {"relationships": [{
                "kind": "SAME",
                "before": {"kind": "method", "key": "a.A#m()"},
                "after": {"kind": "method", "key": "a.A#m()"},
                "similarity": 1.0
            }]}}),
        )]));
        let graph = comparator.compare(&ComparisonRequest::default()).unwrap();
        assert_eq!(graph.relationships[0].kind, RelationshipKind::Same);
    }

    #[test]
    fn replaying_compare_error() {
        let comparator = ReplayingComparator::new(replayer(vec![(
            "comparator",
            "compare",
            json!({"err": "parser crashed"}),
        )]));
        assert!(comparator.compare(&ComparisonRequest::default()).is_err());
    }
}
