//! PatternEventHandler trait, all methods no-op by default.

use super::types::*;

/// Observer of pipeline progress. `Send + Sync` so one handler can serve
/// parallel pipeline stages.
pub trait PatternEventHandler: Send + Sync {
    // ---- Detection ----
    fn on_patterns_detected(&self, _event: &PatternsDetectedEvent) {}
    fn on_detection_failed(&self, _event: &DetectionFailedEvent) {}

    // ---- Extraction ----
    fn on_relations_extracted(&self, _event: &RelationsExtractedEvent) {}
    fn on_extraction_failed(&self, _event: &ExtractionFailedEvent) {}

    // ---- Repository ----
    fn on_unit_committed(&self, _event: &UnitCommittedEvent) {}
    fn on_commit_failed(&self, _event: &CommitFailedEvent) {}

    // ---- Lifecycle ----
    fn on_pipeline_complete(&self, _event: &PipelineCompleteEvent) {}
}
