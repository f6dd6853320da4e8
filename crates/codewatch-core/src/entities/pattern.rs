//! The polymorphic pattern entity and its validating builder.

use serde::{Deserialize, Serialize};

use super::{GenericDetails, HandlerDetails, HandlerPattern, KeeperDetails, KeeperPattern};
use crate::errors::ValidationError;
use crate::types::{Framework, PatternId, PatternType};
use crate::value_objects::{ConfidenceScore, PatternLocation, QualifiedName};

/// Capability implemented by every variant payload.
pub trait PatternRole {
    /// Short role name used in diagnostics.
    fn role(&self) -> &'static str;

    /// Whether this payload can describe a pattern of `pattern_type`.
    fn accepts(&self, pattern_type: &PatternType) -> bool;

    /// Check variant-specific invariants.
    fn validate(&self, pattern_id: &PatternId) -> Result<(), ValidationError>;

    /// Symbols this pattern refers to (dependencies, handled message types).
    /// Extractors resolve these against other patterns' qualified names.
    fn referenced_names(&self) -> Vec<&QualifiedName>;
}

/// Variant-specific payload of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum PatternDetails {
    Keeper(KeeperDetails),
    Handler(HandlerDetails),
    Generic(GenericDetails),
}

impl PatternDetails {
    fn as_role(&self) -> &dyn PatternRole {
        match self {
            Self::Keeper(d) => d,
            Self::Handler(d) => d,
            Self::Generic(d) => d,
        }
    }
}

impl PatternRole for PatternDetails {
    fn role(&self) -> &'static str {
        self.as_role().role()
    }

    fn accepts(&self, pattern_type: &PatternType) -> bool {
        self.as_role().accepts(pattern_type)
    }

    fn validate(&self, pattern_id: &PatternId) -> Result<(), ValidationError> {
        self.as_role().validate(pattern_id)
    }

    fn referenced_names(&self) -> Vec<&QualifiedName> {
        self.as_role().referenced_names()
    }
}

/// A detected instance of an architectural role.
///
/// Only constructible through [`PatternBuilder`], which validates every
/// invariant. There are no setters: a changed pattern is a new instance with
/// a new id (see [`Pattern::rebuild`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPattern")]
pub struct Pattern {
    id: PatternId,
    qualified_name: QualifiedName,
    location: PatternLocation,
    pattern_type: PatternType,
    framework: Framework,
    confidence: ConfidenceScore,
    details: PatternDetails,
}

impl Pattern {
    pub fn builder(
        qualified_name: QualifiedName,
        location: PatternLocation,
        framework: Framework,
    ) -> PatternBuilder {
        PatternBuilder {
            id: None,
            qualified_name,
            location,
            framework,
            confidence: ConfidenceScore::medium(),
        }
    }

    /// A builder seeded with this pattern's attributes but no id, so the
    /// result is a distinct instance.
    pub fn rebuild(&self) -> PatternBuilder {
        PatternBuilder {
            id: None,
            qualified_name: self.qualified_name.clone(),
            location: self.location.clone(),
            framework: self.framework.clone(),
            confidence: self.confidence,
        }
    }

    pub fn id(&self) -> &PatternId {
        &self.id
    }

    pub fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }

    pub fn location(&self) -> &PatternLocation {
        &self.location
    }

    pub fn pattern_type(&self) -> &PatternType {
        &self.pattern_type
    }

    pub fn framework(&self) -> &Framework {
        &self.framework
    }

    pub fn confidence(&self) -> ConfidenceScore {
        self.confidence
    }

    pub fn details(&self) -> &PatternDetails {
        &self.details
    }

    pub fn referenced_names(&self) -> Vec<&QualifiedName> {
        self.details.referenced_names()
    }

    pub fn as_keeper(&self) -> Option<KeeperPattern<'_>> {
        match &self.details {
            PatternDetails::Keeper(details) => Some(KeeperPattern::new(self, details)),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<HandlerPattern<'_>> {
        match &self.details {
            PatternDetails::Handler(details) => Some(HandlerPattern::new(self, details)),
            _ => None,
        }
    }
}

/// Validating constructor for [`Pattern`].
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    id: Option<PatternId>,
    qualified_name: QualifiedName,
    location: PatternLocation,
    framework: Framework,
    confidence: ConfidenceScore,
}

impl PatternBuilder {
    /// Use an explicit id instead of a generated one.
    pub fn id(mut self, id: PatternId) -> Self {
        self.id = Some(id);
        self
    }

    /// Detection confidence. Defaults to `ConfidenceScore::medium()`.
    pub fn confidence(mut self, confidence: ConfidenceScore) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn keeper(self, details: KeeperDetails) -> Result<Pattern, ValidationError> {
        self.build(PatternType::Keeper, PatternDetails::Keeper(details))
    }

    pub fn handler(self, details: HandlerDetails) -> Result<Pattern, ValidationError> {
        self.build(PatternType::Handler, PatternDetails::Handler(details))
    }

    pub fn generic(
        self,
        pattern_type: PatternType,
        details: GenericDetails,
    ) -> Result<Pattern, ValidationError> {
        self.build(pattern_type, PatternDetails::Generic(details))
    }

    pub fn build(
        self,
        pattern_type: PatternType,
        details: PatternDetails,
    ) -> Result<Pattern, ValidationError> {
        let id = self.id.unwrap_or_else(PatternId::generate);
        if !details.accepts(&pattern_type) {
            return Err(ValidationError::InvalidPattern {
                pattern_id: id.to_string(),
                message: format!(
                    "{} details cannot describe a {} pattern",
                    details.role(),
                    pattern_type
                ),
            });
        }
        details.validate(&id)?;
        Ok(Pattern {
            id,
            qualified_name: self.qualified_name,
            location: self.location,
            pattern_type,
            framework: self.framework,
            confidence: self.confidence,
            details,
        })
    }
}

/// Unvalidated wire form; deserialization re-runs the builder checks.
#[derive(Deserialize)]
struct RawPattern {
    id: PatternId,
    qualified_name: QualifiedName,
    location: PatternLocation,
    pattern_type: PatternType,
    framework: Framework,
    confidence: ConfidenceScore,
    details: PatternDetails,
}

impl TryFrom<RawPattern> for Pattern {
    type Error = ValidationError;

    fn try_from(raw: RawPattern) -> Result<Self, Self::Error> {
        Pattern::builder(raw.qualified_name, raw.location, raw.framework)
            .id(raw.id)
            .confidence(raw.confidence)
            .build(raw.pattern_type, raw.details)
    }
}
