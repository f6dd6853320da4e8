//! Versioned schema migrations tracked by `PRAGMA user_version`.

pub mod v001_initial;
pub mod v002_relation_indexes;

use codewatch_core::errors::RepositoryError;
use rusqlite::Connection;

/// Every migration in order. The version is what `user_version` holds once
/// the migration has been applied.
const MIGRATIONS: &[(&str, u32)] = &[
    (v001_initial::MIGRATION_SQL, 1),
    (v002_relation_indexes::MIGRATION_SQL, 2),
];

/// Schema version after all migrations have run.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the database's `user_version`.
/// Each migration and its version bump commit together.
pub fn run_migrations(conn: &Connection) -> Result<(), RepositoryError> {
    let current_version = schema_version(conn)?;

    for (sql, version) in MIGRATIONS {
        if current_version >= *version {
            continue;
        }
        let failed = |e: rusqlite::Error| RepositoryError::MigrationFailed {
            version: *version,
            message: e.to_string(),
        };
        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.pragma_update(None, "user_version", version).map_err(failed)?;
        tx.commit().map_err(failed)?;
        tracing::info!(version, "applied migration");
    }

    Ok(())
}

/// Current `user_version` of the database.
pub fn schema_version(conn: &Connection) -> Result<u32, RepositoryError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| RepositoryError::MigrationFailed {
            version: 0,
            message: e.to_string(),
        })
}
