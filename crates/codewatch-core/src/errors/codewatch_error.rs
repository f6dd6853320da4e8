//! Aggregate domain error.

use super::error_code::CodewatchErrorCode;
use super::{DetectionError, ErrorKind, ExtractionError, RepositoryError, ValidationError};

/// Any domain failure, aggregated via `From` conversions so pipeline code
/// can use `?` across subsystems without losing the original variant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodewatchError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CodewatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(e) => e.kind(),
            Self::Detection(e) => e.kind(),
            Self::Extraction(e) => e.kind(),
            Self::Repository(e) => e.kind(),
        }
    }
}

impl CodewatchErrorCode for CodewatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Detection(e) => e.error_code(),
            Self::Extraction(e) => e.error_code(),
            Self::Repository(e) => e.error_code(),
        }
    }
}
