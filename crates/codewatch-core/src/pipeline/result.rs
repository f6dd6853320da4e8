//! Pipeline results with non-fatal error collection.

use crate::errors::CodewatchError;

/// Counters for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Artifacts whose unit was committed.
    pub artifacts_processed: usize,
    /// Artifacts that failed detection, extraction or commit.
    pub artifacts_failed: usize,
    /// Artifacts of frameworks outside the configured allow-list.
    pub artifacts_skipped: usize,
    pub patterns_committed: usize,
    /// All committed relations, cross-artifact ones included.
    pub relations_committed: usize,
    pub cross_artifact_relations: usize,
    pub duration_ms: u64,
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Partial results survive when some artifacts fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    pub data: T,
    /// Per-artifact failures, in artifact order.
    pub errors: Vec<CodewatchError>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<CodewatchError>) {
        self.errors.push(error.into());
    }

    /// True if no non-fatal errors were collected.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
