//! Event payload types.

use std::path::PathBuf;

use crate::errors::ErrorKind;

/// Payload for `on_patterns_detected`.
#[derive(Debug, Clone)]
pub struct PatternsDetectedEvent {
    pub artifact: PathBuf,
    pub framework: String,
    pub pattern_count: usize,
}

/// Payload for `on_detection_failed`.
#[derive(Debug, Clone)]
pub struct DetectionFailedEvent {
    pub artifact: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// Payload for `on_relations_extracted`. `artifact` is `None` for the
/// cross-artifact pass.
#[derive(Debug, Clone)]
pub struct RelationsExtractedEvent {
    pub artifact: Option<PathBuf>,
    pub relation_count: usize,
}

/// Payload for `on_extraction_failed`.
#[derive(Debug, Clone)]
pub struct ExtractionFailedEvent {
    pub artifact: Option<PathBuf>,
    pub kind: ErrorKind,
    pub message: String,
}

/// Payload for `on_unit_committed`.
#[derive(Debug, Clone)]
pub struct UnitCommittedEvent {
    pub artifact: Option<PathBuf>,
    pub patterns: usize,
    pub relations: usize,
}

/// Payload for `on_commit_failed`.
#[derive(Debug, Clone)]
pub struct CommitFailedEvent {
    pub artifact: Option<PathBuf>,
    pub kind: ErrorKind,
    pub message: String,
}

/// Payload for `on_pipeline_complete`.
#[derive(Debug, Clone)]
pub struct PipelineCompleteEvent {
    pub artifacts_processed: usize,
    pub artifacts_failed: usize,
    pub artifacts_skipped: usize,
    pub patterns_committed: usize,
    pub relations_committed: usize,
    pub duration_ms: u64,
}
