//! Pattern inserts, lookups and keyset-paged filtered scans.

use codewatch_core::entities::{Pattern, PatternDetails};
use codewatch_core::errors::{RepositoryError, ValidationError};
use codewatch_core::repository::{PatternFilter, PatternPage};
use codewatch_core::types::{Framework, PatternId, PatternType};
use codewatch_core::value_objects::{ConfidenceScore, PatternLocation, QualifiedName};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::backend_error;

/// Column list shared by every pattern SELECT; see [`PatternRow`].
const PATTERN_COLUMNS: &str = "id, qualified_name, file_path, start_line, end_line, start_col, end_col, \
     pattern_type, framework, confidence, details";

pub fn insert_pattern(conn: &Connection, pattern: &Pattern) -> Result<(), RepositoryError> {
    let details =
        serde_json::to_string(pattern.details()).map_err(|e| RepositoryError::Serialization {
            message: e.to_string(),
        })?;
    let location = pattern.location();
    conn.prepare_cached(
        "INSERT INTO patterns (id, qualified_name, file_path, start_line, end_line, start_col, end_col,
                               pattern_type, framework, confidence, details)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            pattern.id().as_str(),
            pattern.qualified_name().to_string(),
            location.file_path().to_string_lossy().into_owned(),
            location.start_line(),
            location.end_line(),
            location.start_col(),
            location.end_col(),
            pattern.pattern_type().as_str(),
            pattern.framework().as_str(),
            pattern.confidence().value(),
            details,
        ])
    })
    .map_err(backend_error)?;
    Ok(())
}

pub fn pattern_exists(conn: &Connection, id: &PatternId) -> Result<bool, RepositoryError> {
    conn.prepare_cached("SELECT 1 FROM patterns WHERE id = ?1")
        .and_then(|mut stmt| stmt.exists(params![id.as_str()]))
        .map_err(backend_error)
}

pub fn get_pattern(conn: &Connection, id: &PatternId) -> Result<Option<Pattern>, RepositoryError> {
    let sql = format!("SELECT {PATTERN_COLUMNS} FROM patterns WHERE id = ?1");
    let row = conn
        .prepare_cached(&sql)
        .and_then(|mut stmt| stmt.query_row(params![id.as_str()], PatternRow::read).optional())
        .map_err(backend_error)?;
    row.map(PatternRow::into_pattern).transpose()
}

/// One keyset page in insertion order. Fetches one row past `limit` to
/// learn whether a further page exists.
pub fn find_patterns_page(
    conn: &Connection,
    filter: &PatternFilter,
    after: Option<u64>,
    limit: usize,
) -> Result<PatternPage, RepositoryError> {
    let after = after.map_or(0, |seq| i64::try_from(seq).unwrap_or(i64::MAX));
    let fetch = i64::try_from(limit.saturating_add(1)).unwrap_or(i64::MAX);
    let prefix = filter.qualified_name_prefix.as_ref().map(ToString::to_string);

    let mut stmt = conn
        .prepare_cached(
            &format!(
                "SELECT seq, {PATTERN_COLUMNS} FROM patterns
             WHERE seq > ?1
               AND (?2 IS NULL OR framework = ?2)
               AND (?3 IS NULL OR pattern_type = ?3)
               AND (?4 IS NULL OR confidence >= ?4)
               AND (?5 IS NULL OR qualified_name = ?5
                    OR substr(qualified_name, 1, length(?5) + 1) = ?5 || '.')
             ORDER BY seq
             LIMIT ?6"
            ),
        )
        .map_err(backend_error)?;
    let rows = stmt
        .query_map(
            params![
                after,
                filter.framework.as_ref().map(|f| f.as_str()),
                filter.pattern_type.as_ref().map(|t| t.as_str()),
                filter.min_confidence.map(|c| c.value()),
                prefix,
                fetch,
            ],
            |row| Ok((row.get::<_, i64>(0)?, PatternRow::read_at(row, 1)?)),
        )
        .map_err(backend_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(backend_error)?;

    let has_more = rows.len() > limit;
    let mut items = Vec::with_capacity(rows.len().min(limit));
    let mut last_seq = None;
    for (seq, row) in rows.into_iter().take(limit) {
        items.push(row.into_pattern()?);
        last_seq = Some(seq as u64);
    }
    Ok(PatternPage {
        items,
        next_cursor: if has_more { last_seq } else { None },
    })
}

pub fn delete_pattern(conn: &Connection, id: &PatternId) -> Result<usize, RepositoryError> {
    conn.prepare_cached("DELETE FROM patterns WHERE id = ?1")
        .and_then(|mut stmt| stmt.execute(params![id.as_str()]))
        .map_err(backend_error)
}

pub fn count_patterns(conn: &Connection) -> Result<usize, RepositoryError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM patterns", [], |row| row.get(0))
        .map_err(backend_error)?;
    Ok(count as usize)
}

/// A pattern row as stored, before validation.
struct PatternRow {
    id: String,
    qualified_name: String,
    file_path: String,
    start_line: u32,
    end_line: u32,
    start_col: u32,
    end_col: u32,
    pattern_type: String,
    framework: String,
    confidence: f64,
    details: String,
}

impl PatternRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Self::read_at(row, 0)
    }

    /// Read [`PATTERN_COLUMNS`] starting at column `offset`.
    fn read_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            qualified_name: row.get(offset + 1)?,
            file_path: row.get(offset + 2)?,
            start_line: row.get(offset + 3)?,
            end_line: row.get(offset + 4)?,
            start_col: row.get(offset + 5)?,
            end_col: row.get(offset + 6)?,
            pattern_type: row.get(offset + 7)?,
            framework: row.get(offset + 8)?,
            confidence: row.get(offset + 9)?,
            details: row.get(offset + 10)?,
        })
    }

    /// Rebuild through the validating builder so a tampered row cannot
    /// produce an invalid pattern.
    fn into_pattern(self) -> Result<Pattern, RepositoryError> {
        let id = self.id.clone();
        let invalid = |e: ValidationError| RepositoryError::Serialization {
            message: format!("stored pattern {id} is invalid: {e}"),
        };
        let details: PatternDetails =
            serde_json::from_str(&self.details).map_err(|e| RepositoryError::Serialization {
                message: format!("stored pattern {id} has invalid details: {e}"),
            })?;
        let location = PatternLocation::new(
            self.file_path,
            self.start_line,
            self.end_line,
            self.start_col,
            self.end_col,
        )
        .map_err(invalid)?;
        Pattern::builder(
            QualifiedName::parse(&self.qualified_name).map_err(invalid)?,
            location,
            self.framework.parse::<Framework>().map_err(invalid)?,
        )
        .id(PatternId::new(self.id).map_err(invalid)?)
        .confidence(ConfidenceScore::new(self.confidence).map_err(invalid)?)
        .build(
            self.pattern_type.parse::<PatternType>().map_err(invalid)?,
            details,
        )
        .map_err(invalid)
    }
}
