//! Handler role: a component reacting to triggered messages or queries.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::{Pattern, PatternRole};
use crate::errors::ValidationError;
use crate::types::{PatternId, PatternType};
use crate::value_objects::QualifiedName;

/// What a handler reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Message,
    Query,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message => f.write_str("message"),
            Self::Query => f.write_str("query"),
        }
    }
}

/// Handler-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDetails {
    pub kind: HandlerKind,
    /// The message or query type being handled.
    pub message_type: QualifiedName,
    /// Keepers this handler calls into.
    #[serde(default)]
    pub keeper_dependencies: Vec<QualifiedName>,
}

impl HandlerDetails {
    pub fn new(
        kind: HandlerKind,
        message_type: QualifiedName,
        keeper_dependencies: Vec<QualifiedName>,
    ) -> Self {
        Self {
            kind,
            message_type,
            keeper_dependencies,
        }
    }
}

impl PatternRole for HandlerDetails {
    fn role(&self) -> &'static str {
        "handler"
    }

    fn accepts(&self, pattern_type: &PatternType) -> bool {
        *pattern_type == PatternType::Handler
    }

    fn validate(&self, _pattern_id: &PatternId) -> Result<(), ValidationError> {
        // Kind is a closed enum and names are validated on construction.
        Ok(())
    }

    fn referenced_names(&self) -> Vec<&QualifiedName> {
        self.keeper_dependencies.iter().collect()
    }
}

/// Borrowed view of a pattern known to be a handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerPattern<'a> {
    pattern: &'a Pattern,
    details: &'a HandlerDetails,
}

impl<'a> HandlerPattern<'a> {
    pub(crate) fn new(pattern: &'a Pattern, details: &'a HandlerDetails) -> Self {
        Self { pattern, details }
    }

    pub fn pattern(&self) -> &'a Pattern {
        self.pattern
    }

    pub fn kind(&self) -> HandlerKind {
        self.details.kind
    }

    pub fn message_type(&self) -> &'a QualifiedName {
        &self.details.message_type
    }

    pub fn keeper_dependencies(&self) -> &'a [QualifiedName] {
        &self.details.keeper_dependencies
    }
}

impl Deref for HandlerPattern<'_> {
    type Target = Pattern;

    fn deref(&self) -> &Pattern {
        self.pattern
    }
}
