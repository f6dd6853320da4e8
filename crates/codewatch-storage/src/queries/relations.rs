//! Relation inserts, lookups and adjacency queries.

use std::collections::BTreeMap;

use codewatch_core::entities::PatternRelation;
use codewatch_core::errors::{RepositoryError, ValidationError};
use codewatch_core::repository::RelationDirection;
use codewatch_core::types::{PatternId, RelationId, RelationType};
use codewatch_core::value_objects::ConfidenceScore;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::backend_error;

const RELATION_COLUMNS: &str = "id, source_id, target_id, relation_type, confidence, metadata";

pub fn insert_relation(conn: &Connection, relation: &PatternRelation) -> Result<(), RepositoryError> {
    let metadata =
        serde_json::to_string(relation.metadata()).map_err(|e| RepositoryError::Serialization {
            message: e.to_string(),
        })?;
    conn.prepare_cached(
        "INSERT INTO relations (id, source_id, target_id, relation_type, confidence, metadata)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            relation.id().as_str(),
            relation.source_pattern_id().as_str(),
            relation.target_pattern_id().as_str(),
            relation.relation_type().as_str(),
            relation.confidence().value(),
            metadata,
        ])
    })
    .map_err(backend_error)?;
    Ok(())
}

pub fn relation_exists(conn: &Connection, id: &RelationId) -> Result<bool, RepositoryError> {
    conn.prepare_cached("SELECT 1 FROM relations WHERE id = ?1")
        .and_then(|mut stmt| stmt.exists(params![id.as_str()]))
        .map_err(backend_error)
}

pub fn get_relation(
    conn: &Connection,
    id: &RelationId,
) -> Result<Option<PatternRelation>, RepositoryError> {
    let sql = format!("SELECT {RELATION_COLUMNS} FROM relations WHERE id = ?1");
    let row = conn
        .prepare_cached(&sql)
        .and_then(|mut stmt| stmt.query_row(params![id.as_str()], RelationRow::read).optional())
        .map_err(backend_error)?;
    row.map(RelationRow::into_relation).transpose()
}

/// Relations touching `pattern_id` in the given direction, in insertion
/// order. A relation is listed once even under `Both`.
pub fn relations_for(
    conn: &Connection,
    pattern_id: &PatternId,
    direction: RelationDirection,
) -> Result<Vec<PatternRelation>, RepositoryError> {
    let predicate = match direction {
        RelationDirection::Outgoing => "source_id = ?1",
        RelationDirection::Incoming => "target_id = ?1",
        RelationDirection::Both => "source_id = ?1 OR target_id = ?1",
    };
    let sql = format!("SELECT {RELATION_COLUMNS} FROM relations WHERE {predicate} ORDER BY seq");
    let mut stmt = conn.prepare_cached(&sql).map_err(backend_error)?;
    let rows = stmt
        .query_map(params![pattern_id.as_str()], RelationRow::read)
        .map_err(backend_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(backend_error)?;
    rows.into_iter().map(RelationRow::into_relation).collect()
}

/// Ids of relations with `pattern_id` as either endpoint, in insertion order.
pub fn referencing_relation_ids(
    conn: &Connection,
    pattern_id: &PatternId,
) -> Result<Vec<String>, RepositoryError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id FROM relations WHERE source_id = ?1 OR target_id = ?1 ORDER BY seq",
        )
        .map_err(backend_error)?;
    let ids = stmt
        .query_map(params![pattern_id.as_str()], |row| row.get::<_, String>(0))
        .map_err(backend_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(backend_error)?;
    Ok(ids)
}

pub fn delete_relation(conn: &Connection, id: &RelationId) -> Result<usize, RepositoryError> {
    conn.prepare_cached("DELETE FROM relations WHERE id = ?1")
        .and_then(|mut stmt| stmt.execute(params![id.as_str()]))
        .map_err(backend_error)
}

pub fn count_relations(conn: &Connection) -> Result<usize, RepositoryError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM relations", [], |row| row.get(0))
        .map_err(backend_error)?;
    Ok(count as usize)
}

struct RelationRow {
    id: String,
    source_id: String,
    target_id: String,
    relation_type: String,
    confidence: f64,
    metadata: String,
}

impl RelationRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            source_id: row.get(1)?,
            target_id: row.get(2)?,
            relation_type: row.get(3)?,
            confidence: row.get(4)?,
            metadata: row.get(5)?,
        })
    }

    fn into_relation(self) -> Result<PatternRelation, RepositoryError> {
        let id = self.id.clone();
        let invalid = |e: ValidationError| RepositoryError::Serialization {
            message: format!("stored relation {id} is invalid: {e}"),
        };
        let metadata: BTreeMap<String, serde_json::Value> = serde_json::from_str(&self.metadata)
            .map_err(|e| RepositoryError::Serialization {
                message: format!("stored relation {id} has invalid metadata: {e}"),
            })?;
        let relation = PatternRelation::with_id(
            RelationId::new(self.id).map_err(invalid)?,
            PatternId::new(self.source_id).map_err(invalid)?,
            PatternId::new(self.target_id).map_err(invalid)?,
            self.relation_type.parse::<RelationType>().map_err(invalid)?,
            ConfidenceScore::new(self.confidence).map_err(invalid)?,
        )
        .map_err(invalid)?;
        Ok(metadata
            .into_iter()
            .fold(relation, |relation, (key, value)| relation.with_metadata(key, value)))
    }
}
