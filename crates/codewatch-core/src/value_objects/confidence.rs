//! Confidence score in `[0.0, 1.0]` and the rules for combining scores.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Values this close outside `[0.0, 1.0]` are floating-point noise and snap
/// to the nearest bound.
const NORMALIZATION_EPSILON: f64 = 1e-5;

/// Certainty of a detection or a derived relation.
///
/// NaN is never representable, so the score is totally ordered and can be
/// hashed and used as a map key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    /// Full certainty.
    pub const CERTAIN: Self = Self(1.0);
    /// No confidence at all.
    pub const NONE: Self = Self(0.0);

    /// Create a score, normalizing values within `1e-5` of the range.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        let normalized = if (-NORMALIZATION_EPSILON..0.0).contains(&value) {
            0.0
        } else if value > 1.0 && value <= 1.0 + NORMALIZATION_EPSILON {
            1.0
        } else {
            value
        };

        if !(0.0..=1.0).contains(&normalized) {
            return Err(ValidationError::ConfidenceOutOfRange { value });
        }
        // `+ 0.0` folds -0.0 into 0.0 so equal scores hash equally.
        Ok(Self(normalized + 0.0))
    }

    pub fn high() -> Self {
        Self(0.9)
    }

    pub fn medium() -> Self {
        Self(0.5)
    }

    pub fn low() -> Self {
        Self(0.3)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Conjunction of evidence: a composite is never more certain than its
    /// weakest part.
    pub fn conjoin(self, other: Self) -> Self {
        self.min(other)
    }

    /// Independent evidence for the same finding (noisy-or). Used when two
    /// detections of one symbol are merged.
    pub fn corroborate(self, other: Self) -> Self {
        let combined = 1.0 - (1.0 - self.0) * (1.0 - other.0);
        Self(combined.clamp(0.0, 1.0))
    }

    /// Scale by the strength of structural evidence.
    pub fn scaled(self, evidence: Self) -> Self {
        Self(self.0 * evidence.0)
    }

    /// Confidence of a relation between two endpoints, given the strength of
    /// the evidence for the relation itself. Never exceeds either endpoint.
    pub fn for_relation(source: Self, target: Self, evidence: Self) -> Self {
        source.conjoin(target).scaled(evidence)
    }

    pub fn tier(self) -> ConfidenceTier {
        ConfidenceTier::from_score(self.0)
    }
}

impl PartialEq for ConfidenceScore {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ConfidenceScore {}

impl PartialOrd for ConfidenceScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConfidenceScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for ConfidenceScore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for ConfidenceScore {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(score: ConfidenceScore) -> Self {
        score.0
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.0)
    }
}

/// Graduated confidence tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceTier {
    /// score < 0.50: speculative match.
    Uncertain,
    /// score ≥ 0.50.
    Tentative,
    /// score ≥ 0.70.
    Emerging,
    /// score ≥ 0.85: well-established match.
    Established,
}

impl ConfidenceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Self::Established
        } else if score >= 0.70 {
            Self::Emerging
        } else if score >= 0.50 {
            Self::Tentative
        } else {
            Self::Uncertain
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Established => "established",
            Self::Emerging => "emerging",
            Self::Tentative => "tentative",
            Self::Uncertain => "uncertain",
        }
    }
}
