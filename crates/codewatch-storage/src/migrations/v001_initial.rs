//! v001: patterns and relations.
//!
//! Scalar attributes are columns so filters run in SQL. Variant payloads
//! and relation metadata are JSON. Rows are re-validated on load.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS patterns (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    qualified_name TEXT NOT NULL,
    file_path TEXT NOT NULL,
    start_line INTEGER NOT NULL,
    end_line INTEGER NOT NULL,
    start_col INTEGER NOT NULL,
    end_col INTEGER NOT NULL,
    pattern_type TEXT NOT NULL,
    framework TEXT NOT NULL,
    confidence REAL NOT NULL CHECK (confidence >= 0.0 AND confidence <= 1.0),
    details TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (unixepoch())
);

CREATE INDEX IF NOT EXISTS idx_patterns_framework ON patterns(framework, seq);
CREATE INDEX IF NOT EXISTS idx_patterns_type ON patterns(pattern_type, seq);
CREATE INDEX IF NOT EXISTS idx_patterns_qualified_name ON patterns(qualified_name);

CREATE TABLE IF NOT EXISTS relations (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    source_id TEXT NOT NULL REFERENCES patterns(id) ON DELETE RESTRICT,
    target_id TEXT NOT NULL REFERENCES patterns(id) ON DELETE RESTRICT,
    relation_type TEXT NOT NULL,
    confidence REAL NOT NULL CHECK (confidence >= 0.0 AND confidence <= 1.0),
    metadata TEXT NOT NULL DEFAULT '{}',
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    CHECK (source_id <> target_id)
);
"#;
