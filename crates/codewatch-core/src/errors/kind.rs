//! The closed set of failure kinds.

use std::fmt;

use super::error_code;

/// The eight failure kinds every domain error reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value object or entity was built from data violating its invariants.
    Validation,
    /// A detector failed to process an artifact.
    Detection,
    /// An extractor failed to derive relations from valid patterns.
    Extraction,
    /// Storage-layer failure not covered by a more specific kind.
    Repository,
    /// Lookup by id found nothing.
    NotFound,
    /// Insertion of an entity whose id already exists.
    Duplicate,
    /// A relation references a missing pattern, or a delete would orphan one.
    ReferentialIntegrity,
    /// A detector or extractor was handed a framework it does not implement.
    UnsupportedFramework,
}

impl ErrorKind {
    pub fn all() -> &'static [ErrorKind] {
        &[
            Self::Validation,
            Self::Detection,
            Self::Extraction,
            Self::Repository,
            Self::NotFound,
            Self::Duplicate,
            Self::ReferentialIntegrity,
            Self::UnsupportedFramework,
        ]
    }

    /// `NotFound`, `Duplicate` and `ReferentialIntegrity` are storage-layer
    /// failures refined from `Repository`.
    pub fn is_repository(&self) -> bool {
        matches!(
            self,
            Self::Repository | Self::NotFound | Self::Duplicate | Self::ReferentialIntegrity
        )
    }

    /// The error code string shared by every error of this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => error_code::VALIDATION_ERROR,
            Self::Detection => error_code::DETECTION_ERROR,
            Self::Extraction => error_code::EXTRACTION_ERROR,
            Self::Repository => error_code::REPOSITORY_ERROR,
            Self::NotFound => error_code::NOT_FOUND,
            Self::Duplicate => error_code::DUPLICATE,
            Self::ReferentialIntegrity => error_code::REFERENTIAL_INTEGRITY,
            Self::UnsupportedFramework => error_code::UNSUPPORTED_FRAMEWORK,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Detection => "detection",
            Self::Extraction => "extraction",
            Self::Repository => "repository",
            Self::NotFound => "not_found",
            Self::Duplicate => "duplicate",
            Self::ReferentialIntegrity => "referential_integrity",
            Self::UnsupportedFramework => "unsupported_framework",
        };
        f.write_str(name)
    }
}
