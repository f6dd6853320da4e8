//! Extractor contract.

use crate::artifact::SourceArtifact;
use crate::entities::{Pattern, PatternRelation};
use crate::errors::ExtractionError;
use crate::types::Framework;

/// Derives relations among already-detected patterns.
///
/// Contract for `extract`:
/// - every relation's endpoints are ids drawn from `patterns`; cross-artifact
///   relations come from calling `extract` again with the union of patterns,
///   never from out-of-band lookups;
/// - a relation's confidence is a deterministic function of its endpoints'
///   confidences and the evidence strength, and never exceeds the weaker
///   endpoint (see `ConfidenceScore::for_relation`);
/// - fail with `ExtractionError` on structurally invalid input.
///
/// `artifacts` holds the artifact(s) the patterns were detected in.
pub trait Extractor: Send + Sync {
    /// Unique identifier for this extractor.
    fn id(&self) -> &str;

    /// Frameworks this extractor implements.
    fn supported_frameworks(&self) -> &[Framework];

    fn extract(
        &self,
        patterns: &[Pattern],
        artifacts: &[SourceArtifact],
    ) -> Result<Vec<PatternRelation>, ExtractionError>;

    fn supports(&self, framework: &Framework) -> bool {
        self.supported_frameworks().contains(framework)
    }

    /// Fail with `UnsupportedFramework` if any input pattern belongs to a
    /// framework this extractor does not implement.
    fn ensure_supported(&self, patterns: &[Pattern]) -> Result<(), ExtractionError> {
        match patterns.iter().find(|p| !self.supports(p.framework())) {
            Some(pattern) => Err(ExtractionError::UnsupportedFramework {
                extractor: self.id().to_string(),
                framework: pattern.framework().to_string(),
            }),
            None => Ok(()),
        }
    }
}
