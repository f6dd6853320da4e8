//! Detector contract.

use crate::artifact::SourceArtifact;
use crate::entities::Pattern;
use crate::errors::DetectionError;
use crate::types::Framework;

/// Finds pattern instances in one source artifact.
///
/// Implementations must be stateless and thread-safe: detection runs in
/// parallel across artifacts with no shared mutable state.
///
/// Contract for `detect`:
/// - fail with `DetectionError::UnsupportedFramework` for an artifact whose
///   framework is not in `supported_frameworks()`;
/// - never mutate the artifact;
/// - return freshly constructed patterns with every attribute populated and
///   ids that never collide with ids from earlier calls;
/// - return the complete set for the artifact, or fail for the artifact as a
///   whole (no partial results).
pub trait Detector: Send + Sync {
    /// Unique identifier for this detector.
    fn id(&self) -> &str;

    /// Frameworks this detector implements.
    fn supported_frameworks(&self) -> &[Framework];

    /// Run detection on one artifact.
    fn detect(&self, artifact: &SourceArtifact) -> Result<Vec<Pattern>, DetectionError>;

    fn supports(&self, framework: &Framework) -> bool {
        self.supported_frameworks().contains(framework)
    }

    /// Fail with `UnsupportedFramework` unless the artifact's framework is
    /// supported. Implementations call this first in `detect`.
    fn ensure_supported(&self, artifact: &SourceArtifact) -> Result<(), DetectionError> {
        if self.supports(artifact.framework()) {
            Ok(())
        } else {
            Err(DetectionError::UnsupportedFramework {
                detector: self.id().to_string(),
                framework: artifact.framework().to_string(),
                path: artifact.path_string(),
            })
        }
    }
}
