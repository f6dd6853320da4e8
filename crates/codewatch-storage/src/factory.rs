//! Build the configured repository backend.

use std::path::Path;

use codewatch_core::config::{RepositoryBackend, RepositoryConfig};
use codewatch_core::errors::RepositoryError;
use codewatch_core::repository::InMemoryPatternRepository;
use codewatch_core::traits::PatternRepository;

use crate::repository::SqlitePatternRepository;

/// Open the repository selected by `config`.
///
/// `memory` is process-local and lost on exit; `sqlite` persists to
/// `repository.path`.
pub fn open_repository(
    config: &RepositoryConfig,
) -> Result<Box<dyn PatternRepository>, RepositoryError> {
    let backend = config
        .effective_backend()
        .map_err(|e| RepositoryError::Backend {
            message: e.to_string(),
        })?;
    tracing::info!(%backend, "opening pattern repository");

    match backend {
        RepositoryBackend::Memory => Ok(Box::new(InMemoryPatternRepository::new())),
        RepositoryBackend::Sqlite => {
            let path = config.path.as_deref().ok_or_else(|| RepositoryError::Backend {
                message: "repository.path is required for the sqlite backend".to_string(),
            })?;
            let repo = SqlitePatternRepository::open_with_pool_size(
                Path::new(path),
                config.effective_read_pool_size(),
            )?;
            Ok(Box::new(repo))
        }
    }
}
