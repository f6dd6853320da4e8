//! Dotted, namespaced identifier of the symbol a pattern is attached to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Fully-qualified symbol name as a sequence of non-empty segments,
/// e.g. `cosmos.bank.keeper.Keeper`.
///
/// Segments are whitespace-trimmed at construction; equality and hashing
/// use the normalized sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Parse a dotted name such as `cosmos.bank.keeper.Keeper`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Self::from_segments(input.split('.')).map_err(|e| match e {
            ValidationError::InvalidQualifiedName { message, .. } => {
                ValidationError::InvalidQualifiedName {
                    input: input.to_string(),
                    message,
                }
            }
            other => other,
        })
    }

    /// Join a dotted package path with a symbol name.
    pub fn new(package: &str, name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.contains('.') {
            return Err(ValidationError::InvalidQualifiedName {
                input: format!("{package}.{name}"),
                message: "symbol name cannot contain '.'".to_string(),
            });
        }
        Self::parse(&format!("{}.{}", package.trim(), name))
    }

    /// Build from already-split segments. A segment containing `.` is
    /// rejected, since the dotted form would split it.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for segment in segments {
            let segment = segment.as_ref().trim();
            if segment.is_empty() {
                return Err(ValidationError::InvalidQualifiedName {
                    input: render(&normalized),
                    message: "name segments cannot be empty".to_string(),
                });
            }
            if segment.contains('.') {
                normalized.push(segment.to_string());
                return Err(ValidationError::InvalidQualifiedName {
                    input: render(&normalized),
                    message: format!("segment '{segment}' cannot contain '.'"),
                });
            }
            normalized.push(segment.to_string());
        }
        if normalized.is_empty() {
            return Err(ValidationError::InvalidQualifiedName {
                input: String::new(),
                message: "qualified name cannot be empty".to_string(),
            });
        }
        Ok(Self {
            segments: normalized,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The symbol name (last segment).
    pub fn name(&self) -> &str {
        // Construction guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The dotted package path, or `None` for a single-segment name.
    pub fn package(&self) -> Option<String> {
        match self.segments.split_last() {
            Some((_, package)) if !package.is_empty() => Some(package.join(".")),
            _ => None,
        }
    }

    /// Segment-wise prefix test: `a.b` is a prefix of `a.b.C` but not of `a.bc`.
    pub fn starts_with(&self, prefix: &QualifiedName) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

fn render(segments: &[String]) -> String {
    segments.join(".")
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}

impl FromStr for QualifiedName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_string()
    }
}
