//! ExtractorRegistry: runs extractors over a pattern set and checks every
//! emitted relation against its inputs.

use std::borrow::Cow;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::artifact::SourceArtifact;
use crate::detection::panic_message;
use crate::entities::{Pattern, PatternRelation};
use crate::errors::ExtractionError;
use crate::traits::Extractor;
use crate::types::{Framework, FxHashMap, FxHashSet, PatternId, RelationType};
use crate::value_objects::ConfidenceScore;

type RelationKey = (PatternId, PatternId, RelationType);

pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn count(&self) -> usize {
        self.extractors.len()
    }

    /// Extractors supporting at least one of `frameworks`.
    pub fn extractors_for(&self, frameworks: &[&Framework]) -> Vec<&dyn Extractor> {
        self.extractors
            .iter()
            .filter(|e| frameworks.iter().any(|f| e.supports(f)))
            .map(|e| e.as_ref())
            .collect()
    }

    /// Run every applicable extractor over `patterns`.
    ///
    /// Each extractor sees only the patterns of frameworks it supports.
    /// Relations for the same `(source, target, type)` triple collapse to the
    /// most confident one; output order follows first emission.
    pub fn run(
        &self,
        patterns: &[Pattern],
        artifacts: &[SourceArtifact],
    ) -> Result<Vec<PatternRelation>, ExtractionError> {
        let mut ids = FxHashSet::default();
        for pattern in patterns {
            if !ids.insert(pattern.id()) {
                return Err(ExtractionError::InvalidInput {
                    message: format!("pattern id {} appears more than once", pattern.id()),
                });
            }
        }

        let mut frameworks: Vec<&Framework> = Vec::new();
        for pattern in patterns {
            if !frameworks.contains(&pattern.framework()) {
                frameworks.push(pattern.framework());
            }
        }

        let mut relations: Vec<PatternRelation> = Vec::new();
        let mut by_key: FxHashMap<RelationKey, usize> = FxHashMap::default();
        for extractor in self.extractors_for(&frameworks) {
            let supports_all = patterns.iter().all(|p| extractor.supports(p.framework()));
            let input: Cow<'_, [Pattern]> = if supports_all {
                Cow::Borrowed(patterns)
            } else {
                Cow::Owned(
                    patterns
                        .iter()
                        .filter(|p| extractor.supports(p.framework()))
                        .cloned()
                        .collect(),
                )
            };

            for relation in Self::run_extractor(extractor, &input, artifacts)? {
                let key = (
                    relation.source_pattern_id().clone(),
                    relation.target_pattern_id().clone(),
                    relation.relation_type().clone(),
                );
                match by_key.get(&key) {
                    Some(&idx) => {
                        if relation.confidence() > relations[idx].confidence() {
                            relations[idx] = relation;
                        }
                    }
                    None => {
                        by_key.insert(key, relations.len());
                        relations.push(relation);
                    }
                }
            }
        }

        tracing::debug!(
            patterns = patterns.len(),
            relations = relations.len(),
            "extraction complete"
        );
        Ok(relations)
    }

    /// Run one extractor with the contract enforced: panics become `Failed`,
    /// relations to patterns outside `patterns` become `UnknownEndpoint`, and
    /// relations more confident than their weaker endpoint become
    /// `ConfidenceExceedsEndpoints`.
    pub fn run_extractor(
        extractor: &dyn Extractor,
        patterns: &[Pattern],
        artifacts: &[SourceArtifact],
    ) -> Result<Vec<PatternRelation>, ExtractionError> {
        extractor.ensure_supported(patterns)?;

        let relations =
            match catch_unwind(AssertUnwindSafe(|| extractor.extract(patterns, artifacts))) {
                Ok(result) => result?,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(
                        extractor = extractor.id(),
                        message = %message,
                        "extractor panicked"
                    );
                    return Err(ExtractionError::Failed {
                        extractor: extractor.id().to_string(),
                        message,
                    });
                }
            };

        let confidence: FxHashMap<&PatternId, ConfidenceScore> =
            patterns.iter().map(|p| (p.id(), p.confidence())).collect();
        for relation in &relations {
            let endpoint = |id: &PatternId| {
                confidence
                    .get(id)
                    .copied()
                    .ok_or_else(|| ExtractionError::UnknownEndpoint {
                        extractor: extractor.id().to_string(),
                        relation_id: relation.id().to_string(),
                        pattern_id: id.to_string(),
                    })
            };
            let ceiling = endpoint(relation.source_pattern_id())?
                .conjoin(endpoint(relation.target_pattern_id())?);
            if relation.confidence() > ceiling {
                return Err(ExtractionError::ConfidenceExceedsEndpoints {
                    extractor: extractor.id().to_string(),
                    relation_id: relation.id().to_string(),
                    confidence: relation.confidence().value(),
                    ceiling: ceiling.value(),
                });
            }
        }
        Ok(relations)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
