//! Repository backend configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default number of read connections for durable backends.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
/// Upper bound on read connections.
pub const MAX_READ_POOL_SIZE: usize = 8;

/// Storage backend behind a `PatternRepository`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryBackend {
    /// Process-local, lost on exit.
    Memory,
    /// Durable SQLite file.
    Sqlite,
}

impl RepositoryBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for RepositoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the pattern repository.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RepositoryConfig {
    /// `memory` or `sqlite`. Default: `memory`.
    pub backend: Option<String>,
    /// Database file, required for `sqlite`.
    pub path: Option<String>,
    /// Read connections for durable backends. Default: 4, clamped to 1..=8.
    pub read_pool_size: Option<usize>,
}

impl RepositoryConfig {
    /// Parse the configured backend name, defaulting to `memory`.
    pub fn effective_backend(&self) -> Result<RepositoryBackend, ConfigError> {
        match self.backend.as_deref().map(str::trim) {
            None | Some("memory") => Ok(RepositoryBackend::Memory),
            Some("sqlite") => Ok(RepositoryBackend::Sqlite),
            Some(other) => Err(ConfigError::ValidationFailed {
                field: "repository.backend".to_string(),
                message: format!("unknown backend '{other}', expected 'memory' or 'sqlite'"),
            }),
        }
    }

    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size
            .unwrap_or(DEFAULT_READ_POOL_SIZE)
            .clamp(1, MAX_READ_POOL_SIZE)
    }
}
