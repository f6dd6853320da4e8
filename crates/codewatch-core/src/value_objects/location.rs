//! Source span a pattern was found in.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Source code location: 1-indexed lines, 0-indexed columns.
///
/// Invariants: `start_line ≥ 1`, `end_line ≥ start_line`, and on a single
/// line `end_col ≥ start_col`. The file path is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct PatternLocation {
    file_path: PathBuf,
    start_line: u32,
    end_line: u32,
    start_col: u32,
    end_col: u32,
}

impl PatternLocation {
    pub fn new(
        file_path: impl Into<PathBuf>,
        start_line: u32,
        end_line: u32,
        start_col: u32,
        end_col: u32,
    ) -> Result<Self, ValidationError> {
        let file_path = file_path.into();
        if file_path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidLocation {
                field: "file_path",
                message: "file path cannot be empty".to_string(),
            });
        }
        if start_line < 1 {
            return Err(ValidationError::InvalidLocation {
                field: "start_line",
                message: format!("start line must be positive, got {start_line}"),
            });
        }
        if end_line < start_line {
            return Err(ValidationError::InvalidLocation {
                field: "end_line",
                message: format!("end line ({end_line}) must be >= start line ({start_line})"),
            });
        }
        if start_line == end_line && end_col < start_col {
            return Err(ValidationError::InvalidLocation {
                field: "end_col",
                message: format!(
                    "end column ({end_col}) must be >= start column ({start_col}) on a single line"
                ),
            });
        }
        Ok(Self {
            file_path,
            start_line,
            end_line,
            start_col,
            end_col,
        })
    }

    /// A whole-line location (columns 0..0).
    pub fn at_line(file_path: impl Into<PathBuf>, line: u32) -> Result<Self, ValidationError> {
        Self::new(file_path, line, line, 0, 0)
    }

    /// A zero-width location at one point.
    pub fn single_point(
        file_path: impl Into<PathBuf>,
        line: u32,
        column: u32,
    ) -> Result<Self, ValidationError> {
        Self::new(file_path, line, line, column, column)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    pub fn start_col(&self) -> u32 {
        self.start_col
    }

    pub fn end_col(&self) -> u32 {
        self.end_col
    }

    pub fn line_count(&self) -> u32 {
        self.end_line - self.start_line + 1
    }

    /// Whether `other` lies entirely within this span of the same file.
    pub fn contains(&self, other: &PatternLocation) -> bool {
        self.file_path == other.file_path
            && (self.start_line, self.start_col) <= (other.start_line, other.start_col)
            && (other.end_line, other.end_col) <= (self.end_line, self.end_col)
    }
}

impl fmt::Display for PatternLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_line == self.end_line {
            write!(
                f,
                "{}:{}:{}-{}",
                self.file_path.display(),
                self.start_line,
                self.start_col,
                self.end_col
            )
        } else {
            write!(
                f,
                "{}:{}:{}-{}:{}",
                self.file_path.display(),
                self.start_line,
                self.start_col,
                self.end_line,
                self.end_col
            )
        }
    }
}

/// Unvalidated wire form; deserialization goes through `PatternLocation::new`.
#[derive(Deserialize)]
struct RawLocation {
    file_path: PathBuf,
    start_line: u32,
    end_line: u32,
    start_col: u32,
    end_col: u32,
}

impl TryFrom<RawLocation> for PatternLocation {
    type Error = ValidationError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(
            raw.file_path,
            raw.start_line,
            raw.end_line,
            raw.start_col,
            raw.end_col,
        )
    }
}
