//! Keeper role: a component that owns or guards module state.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::{Pattern, PatternRole};
use crate::errors::ValidationError;
use crate::types::{PatternId, PatternType};
use crate::value_objects::QualifiedName;

/// Keeper-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeeperDetails {
    /// Store keys the keeper reads or writes. At least one is required.
    pub store_keys: Vec<String>,
    /// Other keepers this keeper depends on.
    #[serde(default)]
    pub dependencies: Vec<QualifiedName>,
}

impl KeeperDetails {
    pub fn new<I, S>(store_keys: I, dependencies: Vec<QualifiedName>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store_keys: store_keys.into_iter().map(Into::into).collect(),
            dependencies,
        }
    }
}

impl PatternRole for KeeperDetails {
    fn role(&self) -> &'static str {
        "keeper"
    }

    fn accepts(&self, pattern_type: &PatternType) -> bool {
        *pattern_type == PatternType::Keeper
    }

    fn validate(&self, pattern_id: &PatternId) -> Result<(), ValidationError> {
        if self.store_keys.is_empty() {
            return Err(ValidationError::InvalidPattern {
                pattern_id: pattern_id.to_string(),
                message: "keeper must have at least one store key".to_string(),
            });
        }
        if self.store_keys.iter().any(|key| key.trim().is_empty()) {
            return Err(ValidationError::InvalidPattern {
                pattern_id: pattern_id.to_string(),
                message: "keeper store keys cannot be blank".to_string(),
            });
        }
        Ok(())
    }

    fn referenced_names(&self) -> Vec<&QualifiedName> {
        self.dependencies.iter().collect()
    }
}

/// Borrowed view of a pattern known to be a keeper.
#[derive(Debug, Clone, Copy)]
pub struct KeeperPattern<'a> {
    pattern: &'a Pattern,
    details: &'a KeeperDetails,
}

impl<'a> KeeperPattern<'a> {
    pub(crate) fn new(pattern: &'a Pattern, details: &'a KeeperDetails) -> Self {
        Self { pattern, details }
    }

    pub fn pattern(&self) -> &'a Pattern {
        self.pattern
    }

    pub fn store_keys(&self) -> &'a [String] {
        &self.details.store_keys
    }

    pub fn dependencies(&self) -> &'a [QualifiedName] {
        &self.details.dependencies
    }
}

impl Deref for KeeperPattern<'_> {
    type Target = Pattern;

    fn deref(&self) -> &Pattern {
        self.pattern
    }
}
