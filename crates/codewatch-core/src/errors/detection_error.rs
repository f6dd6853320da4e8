//! Detection errors.

use super::error_code::CodewatchErrorCode;
use super::{ErrorKind, ValidationError};

/// Errors that can occur while a detector processes one artifact.
/// A detection failure always covers the whole artifact.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectionError {
    #[error("Detector {detector} does not support framework {framework} (artifact {path})")]
    UnsupportedFramework {
        detector: String,
        framework: String,
        path: String,
    },

    #[error("Malformed artifact {path}: {message}")]
    MalformedArtifact { path: String, message: String },

    #[error("Detector {detector} failed on {path}: {message}")]
    Failed {
        detector: String,
        path: String,
        message: String,
    },

    #[error("Detector {detector} produced invalid output for {path}: {message}")]
    InvalidOutput {
        detector: String,
        path: String,
        message: String,
    },

    #[error("Detector produced an invalid pattern: {0}")]
    InvalidPattern(#[from] ValidationError),
}

impl DetectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFramework { .. } => ErrorKind::UnsupportedFramework,
            _ => ErrorKind::Detection,
        }
    }
}

impl CodewatchErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        self.kind().code()
    }
}
