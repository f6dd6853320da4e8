//! codewatch-storage: SQLite-backed `PatternRepository`.
//!
//! Write-serialized + read-pooled connections, versioned migrations,
//! keyset-paged pattern queries.

pub mod connection;
pub mod factory;
pub mod migrations;
pub mod queries;
pub mod repository;

pub use connection::DatabaseManager;
pub use factory::open_repository;
pub use repository::SqlitePatternRepository;

use codewatch_core::errors::RepositoryError;

pub(crate) fn backend_error(e: rusqlite::Error) -> RepositoryError {
    RepositoryError::Backend {
        message: e.to_string(),
    }
}
