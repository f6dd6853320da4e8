//! Extraction errors.

use super::error_code::CodewatchErrorCode;
use super::{ErrorKind, ValidationError};

/// Errors that can occur while an extractor derives relations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Extractor {extractor} does not support framework {framework}")]
    UnsupportedFramework { extractor: String, framework: String },

    #[error("Pattern {pattern_id} is missing {expected} data required by {extractor}")]
    MissingVariantData {
        extractor: String,
        pattern_id: String,
        expected: String,
    },

    #[error("Invalid extraction input: {message}")]
    InvalidInput { message: String },

    #[error("Extractor {extractor} emitted relation {relation_id} to pattern {pattern_id} outside its input")]
    UnknownEndpoint {
        extractor: String,
        relation_id: String,
        pattern_id: String,
    },

    #[error("Extractor {extractor} emitted relation {relation_id} with confidence {confidence} above its weakest endpoint ({ceiling})")]
    ConfidenceExceedsEndpoints {
        extractor: String,
        relation_id: String,
        confidence: f64,
        ceiling: f64,
    },

    #[error("Extractor {extractor} failed: {message}")]
    Failed { extractor: String, message: String },

    #[error("Extractor produced an invalid relation: {0}")]
    InvalidRelation(#[from] ValidationError),
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFramework { .. } => ErrorKind::UnsupportedFramework,
            _ => ErrorKind::Extraction,
        }
    }
}

impl CodewatchErrorCode for ExtractionError {
    fn error_code(&self) -> &'static str {
        self.kind().code()
    }
}
