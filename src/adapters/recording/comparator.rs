//! Recording adapter for the `Comparator` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::Comparator;
use crate::relationship::{ComparisonRequest, RelationshipGraph};

/// Records comparator calls while delegating to an inner implementation.
pub struct RecordingComparator {
    inner: Box<dyn Comparator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingComparator {
    /// Creates a new recording comparator wrapping the given implementation.
    pub fn new(inner: Box<dyn Comparator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Comparator for RecordingComparator {
    fn compare(&self, request: &ComparisonRequest) -> Result<RelationshipGraph, PortError> {
        let result = self.inner.compare(request);
        record_result(&self.recorder, "comparator", "compare", request, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::comparator::CommandComparator;

    #[test]
    fn records_request_and_graph() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("comparator.cassette.yaml");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        // Scope the adapter so it's dropped before we try to unwrap
        {
            let command = r#"cat >/dev/null; echo '{"relationships":[]}'"#;
            let comparator = RecordingComparator::new(
                Box::new(CommandComparator::new(command)),
                Arc::clone(&recorder),
            );
            let mut request = ComparisonRequest::default();
            request
                .rename_hints
                .insert("Old.java".into(), "New.java".into());
            assert!(comparator.compare(&request).is_ok());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        assert!(content.contains("comparator"));
        assert!(content.contains("Old.java"));
        assert!(content.contains("relationships"));
    }
}
