//! Immutable, self-validating value objects.
//!
//! Every constructor validates; an instance that exists is consistent.

pub mod confidence;
pub mod location;
pub mod qualified_name;

pub use confidence::{ConfidenceScore, ConfidenceTier};
pub use location::PatternLocation;
pub use qualified_name::QualifiedName;
