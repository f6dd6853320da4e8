//! In-memory `PatternRepository`.
//!
//! A single `RwLock` guards the whole graph, so every write performs its
//! checks and its mutation under one exclusive lock. Readers share the lock
//! and always observe either the state before or after a write.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entities::{Pattern, PatternRelation};
use crate::errors::{EntityKind, RepositoryError};
use crate::traits::PatternRepository;
use crate::types::{FxHashMap, PatternId, RelationId, SmallVec4};

use super::{AnalysisBatch, PatternFilter, PatternPage, RelationDirection};

#[derive(Debug, Default)]
struct GraphState {
    next_seq: u64,
    patterns: BTreeMap<u64, Pattern>,
    pattern_seqs: FxHashMap<PatternId, u64>,
    relations: BTreeMap<u64, PatternRelation>,
    relation_seqs: FxHashMap<RelationId, u64>,
    /// Relation seqs keyed by source pattern.
    outgoing: FxHashMap<PatternId, SmallVec4<u64>>,
    /// Relation seqs keyed by target pattern.
    incoming: FxHashMap<PatternId, SmallVec4<u64>>,
}

impl GraphState {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn check_pattern_absent(&self, id: &PatternId) -> Result<(), RepositoryError> {
        if self.pattern_seqs.contains_key(id) {
            return Err(RepositoryError::Duplicate {
                entity: EntityKind::Pattern,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Endpoint check first, then id uniqueness. `pending` holds pattern ids
    /// that will exist once the surrounding batch is applied.
    fn check_relation(
        &self,
        relation: &PatternRelation,
        pending: &[&PatternId],
    ) -> Result<(), RepositoryError> {
        let present = |id: &PatternId| self.pattern_seqs.contains_key(id) || pending.contains(&id);
        let missing: Vec<String> = [relation.source_pattern_id(), relation.target_pattern_id()]
            .into_iter()
            .filter(|id| !present(id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RepositoryError::MissingEndpoints {
                relation_id: relation.id().to_string(),
                missing,
            });
        }
        if self.relation_seqs.contains_key(relation.id()) {
            return Err(RepositoryError::Duplicate {
                entity: EntityKind::Relation,
                id: relation.id().to_string(),
            });
        }
        Ok(())
    }

    fn insert_pattern(&mut self, pattern: Pattern) {
        let seq = self.next_seq();
        self.pattern_seqs.insert(pattern.id().clone(), seq);
        self.patterns.insert(seq, pattern);
    }

    fn insert_relation(&mut self, relation: PatternRelation) {
        let seq = self.next_seq();
        self.outgoing
            .entry(relation.source_pattern_id().clone())
            .or_default()
            .push(seq);
        self.incoming
            .entry(relation.target_pattern_id().clone())
            .or_default()
            .push(seq);
        self.relation_seqs.insert(relation.id().clone(), seq);
        self.relations.insert(seq, relation);
    }

    fn relation_seqs_for(&self, id: &PatternId, direction: RelationDirection) -> Vec<u64> {
        let mut seqs: Vec<u64> = Vec::new();
        if matches!(direction, RelationDirection::Outgoing | RelationDirection::Both) {
            if let Some(out) = self.outgoing.get(id) {
                seqs.extend(out.iter().copied());
            }
        }
        if matches!(direction, RelationDirection::Incoming | RelationDirection::Both) {
            if let Some(inc) = self.incoming.get(id) {
                seqs.extend(inc.iter().copied());
            }
        }
        seqs.sort_unstable();
        seqs.dedup();
        seqs
    }
}

/// Thread-safe, process-local pattern repository.
#[derive(Debug, Default)]
pub struct InMemoryPatternRepository {
    state: RwLock<GraphState>,
}

impl InMemoryPatternRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, GraphState>, RepositoryError> {
        self.state.read().map_err(|_| RepositoryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, GraphState>, RepositoryError> {
        self.state.write().map_err(|_| RepositoryError::LockPoisoned)
    }
}

impl PatternRepository for InMemoryPatternRepository {
    fn add_pattern(&self, pattern: Pattern) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        state.check_pattern_absent(pattern.id())?;
        tracing::debug!(pattern_id = %pattern.id(), "added pattern");
        state.insert_pattern(pattern);
        Ok(())
    }

    fn add_relation(&self, relation: PatternRelation) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        state.check_relation(&relation, &[])?;
        tracing::debug!(relation_id = %relation.id(), "added relation");
        state.insert_relation(relation);
        Ok(())
    }

    fn commit(&self, batch: AnalysisBatch) -> Result<(), RepositoryError> {
        batch.check_unique_ids()?;
        let mut state = self.write()?;
        for pattern in &batch.patterns {
            state.check_pattern_absent(pattern.id())?;
        }
        let pending: Vec<&PatternId> = batch.patterns.iter().map(|p| p.id()).collect();
        for relation in &batch.relations {
            state.check_relation(relation, &pending)?;
        }

        let (patterns, relations) = (batch.patterns.len(), batch.relations.len());
        for pattern in batch.patterns {
            state.insert_pattern(pattern);
        }
        for relation in batch.relations {
            state.insert_relation(relation);
        }
        tracing::debug!(patterns, relations, "committed batch");
        Ok(())
    }

    fn get_pattern(&self, id: &PatternId) -> Result<Pattern, RepositoryError> {
        let state = self.read()?;
        state
            .pattern_seqs
            .get(id)
            .and_then(|seq| state.patterns.get(seq))
            .cloned()
            .ok_or_else(|| RepositoryError::pattern_not_found(id))
    }

    fn get_relation(&self, id: &RelationId) -> Result<PatternRelation, RepositoryError> {
        let state = self.read()?;
        state
            .relation_seqs
            .get(id)
            .and_then(|seq| state.relations.get(seq))
            .cloned()
            .ok_or_else(|| RepositoryError::relation_not_found(id))
    }

    fn find_patterns_page(
        &self,
        filter: &PatternFilter,
        after: Option<u64>,
        limit: usize,
    ) -> Result<PatternPage, RepositoryError> {
        let state = self.read()?;
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        let mut matching = state
            .patterns
            .range((lower, Bound::Unbounded))
            .filter(|(_, p)| filter.matches(p));

        let mut items = Vec::with_capacity(limit.min(64));
        let mut last_seq = None;
        for (seq, pattern) in matching.by_ref().take(limit) {
            items.push(pattern.clone());
            last_seq = Some(*seq);
        }
        let next_cursor = match matching.next() {
            Some(_) => last_seq,
            None => None,
        };
        Ok(PatternPage { items, next_cursor })
    }

    fn get_relations(
        &self,
        pattern_id: &PatternId,
        direction: RelationDirection,
    ) -> Result<Vec<PatternRelation>, RepositoryError> {
        let state = self.read()?;
        if !state.pattern_seqs.contains_key(pattern_id) {
            return Err(RepositoryError::pattern_not_found(pattern_id));
        }
        Ok(state
            .relation_seqs_for(pattern_id, direction)
            .into_iter()
            .filter_map(|seq| state.relations.get(&seq).cloned())
            .collect())
    }

    fn delete_pattern(&self, id: &PatternId) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        let seq = *state
            .pattern_seqs
            .get(id)
            .ok_or_else(|| RepositoryError::pattern_not_found(id))?;

        let referencing = state.relation_seqs_for(id, RelationDirection::Both);
        if !referencing.is_empty() {
            let relation_ids = referencing
                .iter()
                .filter_map(|s| state.relations.get(s))
                .map(|r| r.id().to_string())
                .collect();
            return Err(RepositoryError::WouldOrphan {
                pattern_id: id.to_string(),
                relation_ids,
            });
        }

        state.patterns.remove(&seq);
        state.pattern_seqs.remove(id);
        state.outgoing.remove(id);
        state.incoming.remove(id);
        tracing::debug!(pattern_id = %id, "deleted pattern");
        Ok(())
    }

    fn delete_relation(&self, id: &RelationId) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        let seq = state
            .relation_seqs
            .remove(id)
            .ok_or_else(|| RepositoryError::relation_not_found(id))?;
        if let Some(relation) = state.relations.remove(&seq) {
            if let Some(out) = state.outgoing.get_mut(relation.source_pattern_id()) {
                out.retain(|s| *s != seq);
            }
            if let Some(inc) = state.incoming.get_mut(relation.target_pattern_id()) {
                inc.retain(|s| *s != seq);
            }
        }
        tracing::debug!(relation_id = %id, "deleted relation");
        Ok(())
    }

    fn pattern_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.patterns.len())
    }

    fn relation_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.relations.len())
    }
}
