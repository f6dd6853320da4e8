//! Tests for backend selection.

use codewatch_core::config::RepositoryConfig;
use codewatch_core::errors::{ErrorKind, RepositoryError};
use codewatch_core::traits::PatternRepository;
use codewatch_storage::open_repository;
use tempfile::TempDir;

/// T1-FAC-01: The default backend is in-memory.
#[test]
fn test_default_backend_is_memory() {
    let repo = open_repository(&RepositoryConfig::default()).unwrap();
    assert_eq!(repo.pattern_count().unwrap(), 0);
}

/// T1-FAC-02: sqlite opens the configured file.
#[test]
fn test_sqlite_backend_opens_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.db");
    let config = RepositoryConfig {
        backend: Some("sqlite".to_string()),
        path: Some(path.to_string_lossy().into_owned()),
        read_pool_size: Some(2),
    };
    let repo = open_repository(&config).unwrap();
    assert_eq!(repo.relation_count().unwrap(), 0);
    assert!(path.exists());
}

/// T1-FAC-03: Unknown backends and missing paths are backend errors.
#[test]
fn test_invalid_backend_config() {
    let unknown = RepositoryConfig {
        backend: Some("postgres".to_string()),
        ..Default::default()
    };
    let err = open_repository(&unknown).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Repository);

    let no_path = RepositoryConfig {
        backend: Some("sqlite".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        open_repository(&no_path).err().unwrap(),
        RepositoryError::Backend { .. }
    ));
}
