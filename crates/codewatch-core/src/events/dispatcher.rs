//! EventDispatcher: synchronous fan-out to registered handlers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::handler::PatternEventHandler;
use super::types::*;
use crate::detection::panic_message;

/// Synchronous event dispatcher. With no handlers registered, emitting is a
/// loop over an empty `Vec`.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn PatternEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn PatternEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// A panicking handler is logged and skipped; later handlers still
    /// receive the event.
    fn emit<F: Fn(&dyn PatternEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| f(handler.as_ref()))) {
                tracing::error!(message = %panic_message(payload.as_ref()), "event handler panicked");
            }
        }
    }

    pub fn emit_patterns_detected(&self, event: &PatternsDetectedEvent) {
        self.emit(|h| h.on_patterns_detected(event));
    }

    pub fn emit_detection_failed(&self, event: &DetectionFailedEvent) {
        self.emit(|h| h.on_detection_failed(event));
    }

    pub fn emit_relations_extracted(&self, event: &RelationsExtractedEvent) {
        self.emit(|h| h.on_relations_extracted(event));
    }

    pub fn emit_extraction_failed(&self, event: &ExtractionFailedEvent) {
        self.emit(|h| h.on_extraction_failed(event));
    }

    pub fn emit_unit_committed(&self, event: &UnitCommittedEvent) {
        self.emit(|h| h.on_unit_committed(event));
    }

    pub fn emit_commit_failed(&self, event: &CommitFailedEvent) {
        self.emit(|h| h.on_commit_failed(event));
    }

    pub fn emit_pipeline_complete(&self, event: &PipelineCompleteEvent) {
        self.emit(|h| h.on_pipeline_complete(event));
    }
}
