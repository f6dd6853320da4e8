//! Built-in extractor deriving `DependsOn` relations from the names a
//! pattern's variant data refers to.

use crate::artifact::SourceArtifact;
use crate::entities::{Pattern, PatternRelation};
use crate::errors::ExtractionError;
use crate::traits::Extractor;
use crate::types::{Framework, FxHashMap, FxHashSet, PatternId, RelationType};
use crate::value_objects::{ConfidenceScore, QualifiedName};

/// Evidence when only the symbol name matches and the package differs.
pub const NAME_MATCH_EVIDENCE: f64 = 0.8;

/// Resolves keeper `dependencies` and handler `keeper_dependencies` against
/// the qualified names of the input patterns, emitting
/// `dependent DependsOn dependency`. Names that resolve to nothing are
/// skipped; the dependency may live outside the analysed unit.
///
/// An exact qualified-name match is full evidence. Failing that, a unique
/// pattern with the same symbol name counts at [`NAME_MATCH_EVIDENCE`].
#[derive(Debug, Clone)]
pub struct DependencyExtractor {
    frameworks: Vec<Framework>,
}

impl DependencyExtractor {
    pub const ID: &'static str = "dependency";

    pub fn new() -> Self {
        Self {
            frameworks: Framework::known(),
        }
    }
}

impl Default for DependencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for DependencyExtractor {
    fn id(&self) -> &str {
        Self::ID
    }

    fn supported_frameworks(&self) -> &[Framework] {
        &self.frameworks
    }

    /// Framework-agnostic: works on any framework, including ones this build
    /// does not know by name.
    fn supports(&self, _framework: &Framework) -> bool {
        true
    }

    fn extract(
        &self,
        patterns: &[Pattern],
        _artifacts: &[SourceArtifact],
    ) -> Result<Vec<PatternRelation>, ExtractionError> {
        let name_evidence = ConfidenceScore::new(NAME_MATCH_EVIDENCE)?;

        let mut by_qualified: FxHashMap<&QualifiedName, Vec<&Pattern>> = FxHashMap::default();
        let mut by_symbol: FxHashMap<&str, Vec<&Pattern>> = FxHashMap::default();
        for pattern in patterns {
            by_qualified
                .entry(pattern.qualified_name())
                .or_default()
                .push(pattern);
            by_symbol
                .entry(pattern.qualified_name().name())
                .or_default()
                .push(pattern);
        }

        let mut relations = Vec::new();
        let mut emitted: FxHashSet<(&PatternId, &PatternId)> = FxHashSet::default();
        for dependent in patterns {
            for reference in dependent.referenced_names() {
                let exact = excluding(by_qualified.get(reference), dependent.id());
                let (targets, evidence, matched) = if !exact.is_empty() {
                    (exact, ConfidenceScore::CERTAIN, "exact")
                } else {
                    let by_name = excluding(by_symbol.get(reference.name()), dependent.id());
                    if by_name.len() != 1 {
                        continue;
                    }
                    (by_name, name_evidence, "name")
                };

                for target in targets {
                    if !emitted.insert((dependent.id(), target.id())) {
                        continue;
                    }
                    let confidence = ConfidenceScore::for_relation(
                        dependent.confidence(),
                        target.confidence(),
                        evidence,
                    );
                    let relation = PatternRelation::new(
                        dependent.id().clone(),
                        target.id().clone(),
                        RelationType::DependsOn,
                        confidence,
                    )?
                    .with_metadata("reference", serde_json::Value::from(reference.to_string()))
                    .with_metadata("match", serde_json::Value::from(matched));
                    relations.push(relation);
                }
            }
        }
        Ok(relations)
    }
}

fn excluding<'p>(candidates: Option<&Vec<&'p Pattern>>, id: &PatternId) -> Vec<&'p Pattern> {
    candidates
        .map(|c| c.iter().copied().filter(|p| p.id() != id).collect())
        .unwrap_or_default()
}
