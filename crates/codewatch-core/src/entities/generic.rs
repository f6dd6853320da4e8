//! Payload for pattern kinds without a dedicated variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PatternRole;
use crate::errors::ValidationError;
use crate::types::{PatternId, PatternType};
use crate::value_objects::QualifiedName;

/// Free-form attributes for any pattern type other than keeper and handler.
/// The `references` list feeds extractors the same way typed dependencies do.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenericDetails {
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub references: Vec<QualifiedName>,
}

impl GenericDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_reference(mut self, name: QualifiedName) -> Self {
        self.references.push(name);
        self
    }
}

impl PatternRole for GenericDetails {
    fn role(&self) -> &'static str {
        "generic"
    }

    fn accepts(&self, pattern_type: &PatternType) -> bool {
        !matches!(pattern_type, PatternType::Keeper | PatternType::Handler)
    }

    fn validate(&self, pattern_id: &PatternId) -> Result<(), ValidationError> {
        if self.attributes.keys().any(|key| key.trim().is_empty()) {
            return Err(ValidationError::InvalidPattern {
                pattern_id: pattern_id.to_string(),
                message: "attribute names cannot be blank".to_string(),
            });
        }
        Ok(())
    }

    fn referenced_names(&self) -> Vec<&QualifiedName> {
        self.references.iter().collect()
    }
}
