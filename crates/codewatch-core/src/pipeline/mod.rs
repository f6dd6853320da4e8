//! Analysis pipeline: artifact → detectors → extractors → repository.

pub mod analysis;
pub mod result;

pub use analysis::AnalysisPipeline;
pub use result::{PipelineResult, PipelineSummary};
