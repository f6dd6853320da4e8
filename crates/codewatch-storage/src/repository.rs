//! `PatternRepository` over SQLite.

use std::path::Path;

use codewatch_core::entities::{Pattern, PatternRelation};
use codewatch_core::errors::{EntityKind, RepositoryError};
use codewatch_core::repository::{AnalysisBatch, PatternFilter, PatternPage, RelationDirection};
use codewatch_core::traits::PatternRepository;
use codewatch_core::types::{PatternId, RelationId};
use rusqlite::Connection;

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{patterns, relations};

/// Durable pattern graph.
///
/// Every write runs its checks and its inserts in one BEGIN IMMEDIATE
/// transaction on the serialized writer, so a failed write leaves the
/// database untouched and concurrent writers cannot both pass a uniqueness
/// check. Reads use the pooled read connections.
pub struct SqlitePatternRepository {
    db: DatabaseManager,
}

impl SqlitePatternRepository {
    pub fn open(path: &Path) -> Result<Self, RepositoryError> {
        Ok(Self {
            db: DatabaseManager::open(path)?,
        })
    }

    pub fn open_with_pool_size(path: &Path, pool_size: usize) -> Result<Self, RepositoryError> {
        Ok(Self {
            db: DatabaseManager::open_with_pool_size(path, pool_size)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }
}

fn check_pattern_absent(conn: &Connection, id: &PatternId) -> Result<(), RepositoryError> {
    if patterns::pattern_exists(conn, id)? {
        return Err(RepositoryError::Duplicate {
            entity: EntityKind::Pattern,
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Endpoints are checked before the id, so a relation that is both
/// dangling and duplicate reports `MissingEndpoints`.
fn check_relation(conn: &Connection, relation: &PatternRelation) -> Result<(), RepositoryError> {
    let mut missing = Vec::new();
    for endpoint in [relation.source_pattern_id(), relation.target_pattern_id()] {
        if !patterns::pattern_exists(conn, endpoint)? {
            missing.push(endpoint.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(RepositoryError::MissingEndpoints {
            relation_id: relation.id().to_string(),
            missing,
        });
    }
    if relations::relation_exists(conn, relation.id())? {
        return Err(RepositoryError::Duplicate {
            entity: EntityKind::Relation,
            id: relation.id().to_string(),
        });
    }
    Ok(())
}

impl PatternRepository for SqlitePatternRepository {
    fn add_pattern(&self, pattern: Pattern) -> Result<(), RepositoryError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                check_pattern_absent(tx, pattern.id())?;
                patterns::insert_pattern(tx, &pattern)
            })
        })?;
        tracing::debug!(id = %pattern.id(), "added pattern");
        Ok(())
    }

    fn add_relation(&self, relation: PatternRelation) -> Result<(), RepositoryError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                check_relation(tx, &relation)?;
                relations::insert_relation(tx, &relation)
            })
        })?;
        tracing::debug!(id = %relation.id(), "added relation");
        Ok(())
    }

    fn commit(&self, batch: AnalysisBatch) -> Result<(), RepositoryError> {
        batch.check_unique_ids()?;
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                for pattern in &batch.patterns {
                    check_pattern_absent(tx, pattern.id())?;
                }
                for pattern in &batch.patterns {
                    patterns::insert_pattern(tx, pattern)?;
                }
                // Batch patterns are visible here, so relations may point at them.
                for relation in &batch.relations {
                    check_relation(tx, relation)?;
                    relations::insert_relation(tx, relation)?;
                }
                Ok(())
            })
        })?;
        tracing::debug!(
            patterns = batch.patterns.len(),
            relations = batch.relations.len(),
            "committed batch"
        );
        Ok(())
    }

    fn get_pattern(&self, id: &PatternId) -> Result<Pattern, RepositoryError> {
        self.db
            .with_reader(|conn| patterns::get_pattern(conn, id))?
            .ok_or_else(|| RepositoryError::pattern_not_found(id))
    }

    fn get_relation(&self, id: &RelationId) -> Result<PatternRelation, RepositoryError> {
        self.db
            .with_reader(|conn| relations::get_relation(conn, id))?
            .ok_or_else(|| RepositoryError::relation_not_found(id))
    }

    fn find_patterns_page(
        &self,
        filter: &PatternFilter,
        after: Option<u64>,
        limit: usize,
    ) -> Result<PatternPage, RepositoryError> {
        self.db
            .with_reader(|conn| patterns::find_patterns_page(conn, filter, after, limit))
    }

    fn get_relations(
        &self,
        pattern_id: &PatternId,
        direction: RelationDirection,
    ) -> Result<Vec<PatternRelation>, RepositoryError> {
        self.db.with_reader(|conn| {
            if !patterns::pattern_exists(conn, pattern_id)? {
                return Err(RepositoryError::pattern_not_found(pattern_id));
            }
            relations::relations_for(conn, pattern_id, direction)
        })
    }

    fn delete_pattern(&self, id: &PatternId) -> Result<(), RepositoryError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                if !patterns::pattern_exists(tx, id)? {
                    return Err(RepositoryError::pattern_not_found(id));
                }
                let relation_ids = relations::referencing_relation_ids(tx, id)?;
                if !relation_ids.is_empty() {
                    return Err(RepositoryError::WouldOrphan {
                        pattern_id: id.to_string(),
                        relation_ids,
                    });
                }
                patterns::delete_pattern(tx, id)?;
                Ok(())
            })
        })?;
        tracing::debug!(%id, "deleted pattern");
        Ok(())
    }

    fn delete_relation(&self, id: &RelationId) -> Result<(), RepositoryError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                if relations::delete_relation(tx, id)? == 0 {
                    return Err(RepositoryError::relation_not_found(id));
                }
                Ok(())
            })
        })?;
        tracing::debug!(%id, "deleted relation");
        Ok(())
    }

    fn pattern_count(&self) -> Result<usize, RepositoryError> {
        self.db.with_reader(patterns::count_patterns)
    }

    fn relation_count(&self) -> Result<usize, RepositoryError> {
        self.db.with_reader(relations::count_relations)
    }
}
