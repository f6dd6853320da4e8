//! Pattern filters and relation directions.

use crate::entities::{Pattern, PatternRelation};
use crate::types::{Framework, PatternId, PatternType};
use crate::value_objects::{ConfidenceScore, QualifiedName};

/// Constraints for `find_patterns`. A `None` field does not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternFilter {
    pub framework: Option<Framework>,
    pub pattern_type: Option<PatternType>,
    /// Segment-wise prefix of the qualified name.
    pub qualified_name_prefix: Option<QualifiedName>,
    /// Inclusive lower bound on confidence.
    pub min_confidence: Option<ConfidenceScore>,
}

impl PatternFilter {
    /// A filter matching every pattern.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn framework(mut self, framework: Framework) -> Self {
        self.framework = Some(framework);
        self
    }

    pub fn pattern_type(mut self, pattern_type: PatternType) -> Self {
        self.pattern_type = Some(pattern_type);
        self
    }

    pub fn qualified_name_prefix(mut self, prefix: QualifiedName) -> Self {
        self.qualified_name_prefix = Some(prefix);
        self
    }

    pub fn min_confidence(mut self, threshold: ConfidenceScore) -> Self {
        self.min_confidence = Some(threshold);
        self
    }

    pub fn matches(&self, pattern: &Pattern) -> bool {
        if let Some(ref framework) = self.framework {
            if pattern.framework() != framework {
                return false;
            }
        }
        if let Some(ref pattern_type) = self.pattern_type {
            if pattern.pattern_type() != pattern_type {
                return false;
            }
        }
        if let Some(ref prefix) = self.qualified_name_prefix {
            if !pattern.qualified_name().starts_with(prefix) {
                return false;
            }
        }
        if let Some(threshold) = self.min_confidence {
            if pattern.confidence() < threshold {
                return false;
            }
        }
        true
    }
}

/// Which relations of a pattern to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationDirection {
    /// Relations whose source is the pattern.
    Outgoing,
    /// Relations whose target is the pattern.
    Incoming,
    Both,
}

impl RelationDirection {
    pub fn includes(&self, relation: &PatternRelation, pattern_id: &PatternId) -> bool {
        match self {
            Self::Outgoing => relation.source_pattern_id() == pattern_id,
            Self::Incoming => relation.target_pattern_id() == pattern_id,
            Self::Both => relation.touches(pattern_id),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
            Self::Both => "both",
        }
    }
}
