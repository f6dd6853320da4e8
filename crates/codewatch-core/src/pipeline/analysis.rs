//! AnalysisPipeline: detection in parallel, extraction and commit per
//! artifact, then an optional cross-artifact pass.

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use crate::artifact::SourceArtifact;
use crate::config::CodewatchConfig;
use crate::detection::DetectorRegistry;
use crate::entities::{Pattern, PatternRelation};
use crate::errors::{CodewatchError, DetectionError};
use crate::events::*;
use crate::extraction::ExtractorRegistry;
use crate::repository::AnalysisBatch;
use crate::traits::PatternRepository;
use crate::types::{FxHashMap, FxHashSet, PatternId, RelationType};

use super::{PipelineResult, PipelineSummary};

enum Detected {
    Skipped,
    Patterns(Vec<Pattern>),
    Failed(DetectionError),
}

/// Drives artifacts through detection, extraction and storage.
///
/// Failures are isolated per artifact: a failing artifact is reported in
/// `PipelineResult::errors` and commits nothing, while other artifacts'
/// units are unaffected.
pub struct AnalysisPipeline {
    detectors: DetectorRegistry,
    extractors: ExtractorRegistry,
    events: EventDispatcher,
    config: CodewatchConfig,
}

impl AnalysisPipeline {
    /// Detectors listed in `detection.disabled_detectors` are disabled here.
    pub fn new(
        mut detectors: DetectorRegistry,
        extractors: ExtractorRegistry,
        events: EventDispatcher,
        config: CodewatchConfig,
    ) -> Self {
        for id in &config.detection.disabled_detectors {
            detectors.disable(id);
        }
        Self {
            detectors,
            extractors,
            events,
            config,
        }
    }

    pub fn config(&self) -> &CodewatchConfig {
        &self.config
    }

    pub fn detectors(&self) -> &DetectorRegistry {
        &self.detectors
    }

    pub fn run<R: PatternRepository + ?Sized>(
        &self,
        artifacts: &[SourceArtifact],
        repo: &R,
    ) -> PipelineResult<PipelineSummary> {
        let start = Instant::now();
        let mut result = PipelineResult::new(PipelineSummary::default());

        let detected: Vec<Detected> = artifacts.par_iter().map(|a| self.detect(a)).collect();

        let pattern_threshold = self.config.detection.effective_min_confidence();
        let relation_threshold = self.config.extraction.effective_min_confidence();

        let mut committed_artifacts: Vec<SourceArtifact> = Vec::new();
        let mut committed_patterns: Vec<Pattern> = Vec::new();
        let mut origin: FxHashMap<PatternId, usize> = FxHashMap::default();
        let mut committed_keys: FxHashSet<(PatternId, PatternId, RelationType)> =
            FxHashSet::default();

        for (artifact, outcome) in artifacts.iter().zip(detected) {
            let patterns = match outcome {
                Detected::Skipped => {
                    result.data.artifacts_skipped += 1;
                    continue;
                }
                Detected::Failed(e) => {
                    result.data.artifacts_failed += 1;
                    result.add_error(e);
                    continue;
                }
                Detected::Patterns(patterns) => patterns
                    .into_iter()
                    .filter(|p| p.confidence().value() >= pattern_threshold)
                    .collect::<Vec<_>>(),
            };

            let relations = match self.extractors.run(&patterns, std::slice::from_ref(artifact)) {
                Ok(relations) => above(relations, relation_threshold),
                Err(e) => {
                    tracing::warn!(path = %artifact.path().display(), error = %e, "extraction failed");
                    self.events.emit_extraction_failed(&ExtractionFailedEvent {
                        artifact: Some(artifact.path().to_path_buf()),
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                    result.data.artifacts_failed += 1;
                    result.add_error(e);
                    continue;
                }
            };
            self.events.emit_relations_extracted(&RelationsExtractedEvent {
                artifact: Some(artifact.path().to_path_buf()),
                relation_count: relations.len(),
            });

            let keys: Vec<_> = relations.iter().map(relation_key).collect();
            let batch = AnalysisBatch::new(patterns, relations);
            let (pattern_count, relation_count) = (batch.patterns.len(), batch.relations.len());
            let kept = batch.patterns.clone();
            if let Err(e) = self.commit(repo, batch, Some(artifact.path().to_path_buf())) {
                result.data.artifacts_failed += 1;
                result.add_error(e);
                continue;
            }

            let index = committed_artifacts.len();
            for pattern in &kept {
                origin.insert(pattern.id().clone(), index);
            }
            committed_patterns.extend(kept);
            committed_artifacts.push(artifact.clone());
            committed_keys.extend(keys);
            result.data.artifacts_processed += 1;
            result.data.patterns_committed += pattern_count;
            result.data.relations_committed += relation_count;
        }

        if self.config.extraction.effective_cross_artifact() && committed_artifacts.len() > 1 {
            self.cross_artifact_pass(
                repo,
                &committed_patterns,
                &committed_artifacts,
                &origin,
                &committed_keys,
                relation_threshold,
                &mut result,
            );
        }

        result.data.duration_ms = start.elapsed().as_millis() as u64;
        let summary = &result.data;
        tracing::info!(
            processed = summary.artifacts_processed,
            failed = summary.artifacts_failed,
            skipped = summary.artifacts_skipped,
            patterns = summary.patterns_committed,
            relations = summary.relations_committed,
            duration_ms = summary.duration_ms,
            "pipeline complete"
        );
        self.events.emit_pipeline_complete(&PipelineCompleteEvent {
            artifacts_processed: summary.artifacts_processed,
            artifacts_failed: summary.artifacts_failed,
            artifacts_skipped: summary.artifacts_skipped,
            patterns_committed: summary.patterns_committed,
            relations_committed: summary.relations_committed,
            duration_ms: summary.duration_ms,
        });
        result
    }

    fn detect(&self, artifact: &SourceArtifact) -> Detected {
        if !self.config.detection.allows_framework(artifact.framework()) {
            tracing::debug!(
                path = %artifact.path().display(),
                framework = %artifact.framework(),
                "framework not enabled, skipping"
            );
            return Detected::Skipped;
        }
        match self.detectors.run(artifact) {
            Ok(patterns) => {
                self.events.emit_patterns_detected(&PatternsDetectedEvent {
                    artifact: artifact.path().to_path_buf(),
                    framework: artifact.framework().to_string(),
                    pattern_count: patterns.len(),
                });
                Detected::Patterns(patterns)
            }
            Err(e) => {
                tracing::warn!(path = %artifact.path().display(), error = %e, "detection failed");
                self.events.emit_detection_failed(&DetectionFailedEvent {
                    artifact: artifact.path().to_path_buf(),
                    kind: e.kind(),
                    message: e.to_string(),
                });
                Detected::Failed(e)
            }
        }
    }

    fn commit<R: PatternRepository + ?Sized>(
        &self,
        repo: &R,
        batch: AnalysisBatch,
        artifact: Option<PathBuf>,
    ) -> Result<(), CodewatchError> {
        let (patterns, relations) = (batch.patterns.len(), batch.relations.len());
        match repo.commit(batch) {
            Ok(()) => {
                self.events.emit_unit_committed(&UnitCommittedEvent {
                    artifact,
                    patterns,
                    relations,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    path = ?artifact.as_ref().map(|p| p.display().to_string()),
                    error = %e,
                    "commit failed"
                );
                self.events.emit_commit_failed(&CommitFailedEvent {
                    artifact,
                    kind: e.kind(),
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn cross_artifact_pass<R: PatternRepository + ?Sized>(
        &self,
        repo: &R,
        patterns: &[Pattern],
        artifacts: &[SourceArtifact],
        origin: &FxHashMap<PatternId, usize>,
        committed_keys: &FxHashSet<(PatternId, PatternId, RelationType)>,
        threshold: f64,
        result: &mut PipelineResult<PipelineSummary>,
    ) {
        let relations = match self.extractors.run(patterns, artifacts) {
            Ok(relations) => relations,
            Err(e) => {
                tracing::warn!(error = %e, "cross-artifact extraction failed");
                self.events.emit_extraction_failed(&ExtractionFailedEvent {
                    artifact: None,
                    kind: e.kind(),
                    message: e.to_string(),
                });
                result.add_error(e);
                return;
            }
        };

        let crossing: Vec<PatternRelation> = above(relations, threshold)
            .into_iter()
            .filter(|r| origin.get(r.source_pattern_id()) != origin.get(r.target_pattern_id()))
            .filter(|r| !committed_keys.contains(&relation_key(r)))
            .collect();
        self.events.emit_relations_extracted(&RelationsExtractedEvent {
            artifact: None,
            relation_count: crossing.len(),
        });
        if crossing.is_empty() {
            return;
        }

        let count = crossing.len();
        match self.commit(repo, AnalysisBatch::new(Vec::new(), crossing), None) {
            Ok(()) => {
                result.data.relations_committed += count;
                result.data.cross_artifact_relations += count;
            }
            Err(e) => result.add_error(e),
        }
    }
}

fn above(relations: Vec<PatternRelation>, threshold: f64) -> Vec<PatternRelation> {
    relations
        .into_iter()
        .filter(|r| r.confidence().value() >= threshold)
        .collect()
}

fn relation_key(relation: &PatternRelation) -> (PatternId, PatternId, RelationType) {
    (
        relation.source_pattern_id().clone(),
        relation.target_pattern_id().clone(),
        relation.relation_type().clone(),
    )
}
