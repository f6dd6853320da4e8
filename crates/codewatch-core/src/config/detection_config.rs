//! Detection configuration.

use serde::{Deserialize, Serialize};

use crate::types::Framework;

/// Configuration for the detection stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Patterns below this confidence are dropped. Default: 0.0.
    pub min_confidence: Option<f64>,
    /// Detector ids that never run.
    pub disabled_detectors: Vec<String>,
    /// Frameworks to analyse. Empty means all.
    pub frameworks: Vec<String>,
}

impl DetectionConfig {
    /// Returns the effective confidence threshold, defaulting to 0.0.
    pub fn effective_min_confidence(&self) -> f64 {
        self.min_confidence.unwrap_or(0.0)
    }

    /// Whether artifacts of `framework` are analysed at all.
    pub fn allows_framework(&self, framework: &Framework) -> bool {
        self.frameworks.is_empty()
            || self
                .frameworks
                .iter()
                .filter_map(|f| f.parse::<Framework>().ok())
                .any(|f| &f == framework)
    }
}
