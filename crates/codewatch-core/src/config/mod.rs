//! Configuration system for Codewatch.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod codewatch_config;
pub mod detection_config;
pub mod extraction_config;
pub mod repository_config;

pub use codewatch_config::{CliOverrides, CodewatchConfig};
pub use detection_config::DetectionConfig;
pub use extraction_config::ExtractionConfig;
pub use repository_config::{RepositoryBackend, RepositoryConfig};
