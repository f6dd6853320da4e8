//! One analysis unit's worth of writes, committed atomically.

use crate::entities::{Pattern, PatternRelation};
use crate::errors::{EntityKind, RepositoryError};
use crate::types::FxHashSet;

/// Patterns and relations produced for one analysis unit (typically one
/// artifact). `PatternRepository::commit` stores all of it or none of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisBatch {
    pub patterns: Vec<Pattern>,
    pub relations: Vec<PatternRelation>,
}

impl AnalysisBatch {
    pub fn new(patterns: Vec<Pattern>, relations: Vec<PatternRelation>) -> Self {
        Self {
            patterns,
            relations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.relations.is_empty()
    }

    /// Reject a batch that repeats a pattern or relation id within itself.
    /// Backends run this before consulting stored state.
    pub fn check_unique_ids(&self) -> Result<(), RepositoryError> {
        let mut pattern_ids = FxHashSet::default();
        for pattern in &self.patterns {
            if !pattern_ids.insert(pattern.id()) {
                return Err(RepositoryError::Duplicate {
                    entity: EntityKind::Pattern,
                    id: pattern.id().to_string(),
                });
            }
        }
        let mut relation_ids = FxHashSet::default();
        for relation in &self.relations {
            if !relation_ids.insert(relation.id()) {
                return Err(RepositoryError::Duplicate {
                    entity: EntityKind::Relation,
                    id: relation.id().to_string(),
                });
            }
        }
        Ok(())
    }
}
