//! Typed, directed, confidence-scored edge between two patterns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::types::{PatternId, RelationId, RelationType};
use crate::value_objects::ConfidenceScore;

/// A relation between two pattern instances.
///
/// Self-relations are rejected at construction. Whether both endpoints
/// exist is checked by the repository at insertion, since a relation is
/// usually built before its endpoints are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRelation")]
pub struct PatternRelation {
    id: RelationId,
    source_pattern_id: PatternId,
    target_pattern_id: PatternId,
    relation_type: RelationType,
    confidence: ConfidenceScore,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl PatternRelation {
    /// Create a relation with a freshly generated id.
    pub fn new(
        source_pattern_id: PatternId,
        target_pattern_id: PatternId,
        relation_type: RelationType,
        confidence: ConfidenceScore,
    ) -> Result<Self, ValidationError> {
        Self::with_id(
            RelationId::generate(),
            source_pattern_id,
            target_pattern_id,
            relation_type,
            confidence,
        )
    }

    pub fn with_id(
        id: RelationId,
        source_pattern_id: PatternId,
        target_pattern_id: PatternId,
        relation_type: RelationType,
        confidence: ConfidenceScore,
    ) -> Result<Self, ValidationError> {
        if source_pattern_id == target_pattern_id {
            return Err(ValidationError::SelfRelation {
                relation_id: id.to_string(),
                pattern_id: source_pattern_id.to_string(),
            });
        }
        Ok(Self {
            id,
            source_pattern_id,
            target_pattern_id,
            relation_type,
            confidence,
            metadata: BTreeMap::new(),
        })
    }

    /// Attach a metadata entry while the relation is being built.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> &RelationId {
        &self.id
    }

    pub fn source_pattern_id(&self) -> &PatternId {
        &self.source_pattern_id
    }

    pub fn target_pattern_id(&self) -> &PatternId {
        &self.target_pattern_id
    }

    pub fn relation_type(&self) -> &RelationType {
        &self.relation_type
    }

    pub fn confidence(&self) -> ConfidenceScore {
        self.confidence
    }

    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Whether `pattern_id` is either endpoint.
    pub fn touches(&self, pattern_id: &PatternId) -> bool {
        self.source_pattern_id == *pattern_id || self.target_pattern_id == *pattern_id
    }
}

#[derive(Deserialize)]
struct RawRelation {
    id: RelationId,
    source_pattern_id: PatternId,
    target_pattern_id: PatternId,
    relation_type: RelationType,
    confidence: ConfidenceScore,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawRelation> for PatternRelation {
    type Error = ValidationError;

    fn try_from(raw: RawRelation) -> Result<Self, Self::Error> {
        let mut relation = Self::with_id(
            raw.id,
            raw.source_pattern_id,
            raw.target_pattern_id,
            raw.relation_type,
            raw.confidence,
        )?;
        relation.metadata = raw.metadata;
        Ok(relation)
    }
}
