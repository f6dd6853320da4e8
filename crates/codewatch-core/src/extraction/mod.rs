//! Relation extraction: the extractor registry and built-in extractors.

pub mod dependency;
pub mod registry;

pub use dependency::DependencyExtractor;
pub use registry::ExtractorRegistry;
