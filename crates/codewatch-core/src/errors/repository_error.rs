//! Repository errors.

use std::fmt;

use super::error_code::{self, CodewatchErrorCode};
use super::ErrorKind;

/// Which graph entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Pattern,
    Relation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern => f.write_str("pattern"),
            Self::Relation => f.write_str("relation"),
        }
    }
}

/// Errors that can occur in a `PatternRepository`.
/// Deterministic; the repository never retries on the caller's behalf.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: String },

    #[error("{entity} {id} already exists")]
    Duplicate { entity: EntityKind, id: String },

    #[error("Relation {relation_id} references missing patterns: {}", missing.join(", "))]
    MissingEndpoints {
        relation_id: String,
        missing: Vec<String>,
    },

    #[error("Deleting pattern {pattern_id} would orphan relations: {}", relation_ids.join(", "))]
    WouldOrphan {
        pattern_id: String,
        relation_ids: Vec<String>,
    },

    #[error("Storage backend error: {message}")]
    Backend { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Repository lock poisoned")]
    LockPoisoned,
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::MissingEndpoints { .. } | Self::WouldOrphan { .. } => {
                ErrorKind::ReferentialIntegrity
            }
            _ => ErrorKind::Repository,
        }
    }

    pub fn pattern_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: EntityKind::Pattern,
            id: id.to_string(),
        }
    }

    pub fn relation_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: EntityKind::Relation,
            id: id.to_string(),
        }
    }
}

impl CodewatchErrorCode for RepositoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            _ => self.kind().code(),
        }
    }
}
