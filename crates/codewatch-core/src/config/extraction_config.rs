//! Extraction configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the extraction stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Relations below this confidence are dropped. Default: 0.0.
    pub min_confidence: Option<f64>,
    /// Run a final extraction pass over all committed patterns. Default: true.
    pub cross_artifact: Option<bool>,
}

impl ExtractionConfig {
    pub fn effective_min_confidence(&self) -> f64 {
        self.min_confidence.unwrap_or(0.0)
    }

    pub fn effective_cross_artifact(&self) -> bool {
        self.cross_artifact.unwrap_or(true)
    }
}
