//! DetectorRegistry: register, enable/disable, run with contract checks.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::artifact::SourceArtifact;
use crate::entities::Pattern;
use crate::errors::DetectionError;
use crate::traits::Detector;
use crate::types::{Framework, FxHashSet};

use super::panic_message;

/// Detector id reported when no registered detector supports an artifact.
pub const REGISTRY_ID: &str = "detector-registry";

/// Registry of detectors. Detectors are looked up by framework; disabled
/// ids are skipped.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
    disabled: FxHashSet<String>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            disabled: FxHashSet::default(),
        }
    }

    /// Register a detector.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Disable a detector by id.
    pub fn disable(&mut self, id: &str) {
        self.disabled.insert(id.to_string());
    }

    /// Enable a previously disabled detector.
    pub fn enable(&mut self, id: &str) {
        self.disabled.remove(id);
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled.contains(id)
    }

    /// Total registered detectors (enabled or not).
    pub fn count(&self) -> usize {
        self.detectors.len()
    }

    pub fn enabled_count(&self) -> usize {
        self.detectors
            .iter()
            .filter(|d| self.is_enabled(d.id()))
            .count()
    }

    /// Enabled detectors that declare support for `framework`.
    pub fn detectors_for(&self, framework: &Framework) -> Vec<&dyn Detector> {
        self.detectors
            .iter()
            .filter(|d| self.is_enabled(d.id()) && d.supports(framework))
            .map(|d| d.as_ref())
            .collect()
    }

    /// Run every enabled detector supporting the artifact's framework.
    ///
    /// Returns the complete pattern set sorted by location, or the first
    /// error. Fails with `UnsupportedFramework` when no enabled detector
    /// supports the artifact.
    pub fn run(&self, artifact: &SourceArtifact) -> Result<Vec<Pattern>, DetectionError> {
        let detectors = self.detectors_for(artifact.framework());
        if detectors.is_empty() {
            return Err(DetectionError::UnsupportedFramework {
                detector: REGISTRY_ID.to_string(),
                framework: artifact.framework().to_string(),
                path: artifact.path_string(),
            });
        }

        let mut patterns = Vec::new();
        let mut seen = FxHashSet::default();
        for detector in detectors {
            for pattern in Self::run_detector(detector, artifact)? {
                if !seen.insert(pattern.id().clone()) {
                    return Err(DetectionError::InvalidOutput {
                        detector: detector.id().to_string(),
                        path: artifact.path_string(),
                        message: format!("pattern id {} reused across detectors", pattern.id()),
                    });
                }
                patterns.push(pattern);
            }
        }

        sort_by_location(&mut patterns);
        tracing::debug!(
            path = %artifact.path().display(),
            patterns = patterns.len(),
            "detection complete"
        );
        Ok(patterns)
    }

    /// Run one detector with the contract enforced: framework support is
    /// checked before the call, panics become `Failed`, and malformed output
    /// becomes `InvalidOutput`.
    pub fn run_detector(
        detector: &dyn Detector,
        artifact: &SourceArtifact,
    ) -> Result<Vec<Pattern>, DetectionError> {
        detector.ensure_supported(artifact)?;

        let patterns = match catch_unwind(AssertUnwindSafe(|| detector.detect(artifact))) {
            Ok(result) => result?,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(
                    detector = detector.id(),
                    path = %artifact.path().display(),
                    message = %message,
                    "detector panicked"
                );
                return Err(DetectionError::Failed {
                    detector: detector.id().to_string(),
                    path: artifact.path_string(),
                    message,
                });
            }
        };

        check_output(detector, artifact, &patterns)?;
        Ok(patterns)
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn check_output(
    detector: &dyn Detector,
    artifact: &SourceArtifact,
    patterns: &[Pattern],
) -> Result<(), DetectionError> {
    let invalid = |message: String| DetectionError::InvalidOutput {
        detector: detector.id().to_string(),
        path: artifact.path_string(),
        message,
    };

    let mut ids = FxHashSet::default();
    for pattern in patterns {
        if pattern.framework() != artifact.framework() {
            return Err(invalid(format!(
                "pattern {} has framework {}, artifact is {}",
                pattern.id(),
                pattern.framework(),
                artifact.framework()
            )));
        }
        if pattern.location().file_path() != artifact.path() {
            return Err(invalid(format!(
                "pattern {} located in {}",
                pattern.id(),
                pattern.location().file_path().display()
            )));
        }
        if !ids.insert(pattern.id()) {
            return Err(invalid(format!("duplicate pattern id {}", pattern.id())));
        }
    }
    Ok(())
}

fn sort_by_location(patterns: &mut [Pattern]) {
    patterns.sort_by(|a, b| {
        let (la, lb) = (a.location(), b.location());
        la.file_path()
            .cmp(lb.file_path())
            .then(la.start_line().cmp(&lb.start_line()))
            .then(la.start_col().cmp(&lb.start_col()))
            .then(la.end_line().cmp(&lb.end_line()))
            .then(la.end_col().cmp(&lb.end_col()))
    });
}
