//! codewatch-core: pattern/relation model, error taxonomy and the
//! Detector → Extractor → Repository contracts, plus the registries,
//! in-memory repository, analysis pipeline, events, config and tracing
//! that drive them.

pub mod artifact;
pub mod config;
pub mod detection;
pub mod entities;
pub mod errors;
pub mod events;
pub mod extraction;
pub mod pipeline;
pub mod repository;
pub mod tracing;
pub mod traits;
pub mod types;
pub mod value_objects;

pub use artifact::SourceArtifact;
pub use config::CodewatchConfig;
pub use entities::{
    HandlerDetails, HandlerKind, KeeperDetails, Pattern, PatternDetails, PatternRelation,
};
pub use errors::{CodewatchError, ErrorKind};
pub use repository::{AnalysisBatch, InMemoryPatternRepository, PatternFilter, RelationDirection};
pub use traits::{Detector, Extractor, PatternRepository, PatternRepositoryExt};
pub use types::{Framework, PatternId, PatternType, RelationId, RelationType};
pub use value_objects::{ConfidenceScore, PatternLocation, QualifiedName};
