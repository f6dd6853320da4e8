//! v002: adjacency indexes for relation lookups by endpoint.

pub const MIGRATION_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_relations_source ON relations(source_id, seq);
CREATE INDEX IF NOT EXISTS idx_relations_target ON relations(target_id, seq);
"#;
