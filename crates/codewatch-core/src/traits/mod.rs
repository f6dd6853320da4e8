//! Capability contracts: detection, extraction, storage.

pub mod detector;
pub mod extractor;
pub mod repository;

pub use detector::Detector;
pub use extractor::Extractor;
pub use repository::{PatternRepository, PatternRepositoryExt};
