//! Validation errors raised at construction time.

use super::error_code::{self, CodewatchErrorCode};
use super::ErrorKind;

/// Errors raised when a value object or entity would violate its invariants.
/// No invalid instance is ever observable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Confidence score must be between 0.0 and 1.0, got {value}")]
    ConfidenceOutOfRange { value: f64 },

    #[error("Invalid location {field}: {message}")]
    InvalidLocation { field: &'static str, message: String },

    #[error("Invalid qualified name '{input}': {message}")]
    InvalidQualifiedName { input: String, message: String },

    #[error("Invalid identifier: {message}")]
    InvalidIdentifier { message: String },

    #[error("Invalid {enumeration} value: {message}")]
    InvalidEnumValue { enumeration: &'static str, message: String },

    #[error("Invalid pattern {pattern_id}: {message}")]
    InvalidPattern { pattern_id: String, message: String },

    #[error("Relation {relation_id} links pattern {pattern_id} to itself")]
    SelfRelation { relation_id: String, pattern_id: String },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

impl CodewatchErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        error_code::VALIDATION_ERROR
    }
}
