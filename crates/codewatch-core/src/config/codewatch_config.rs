//! Top-level Codewatch configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DetectionConfig, ExtractionConfig, RepositoryBackend, RepositoryConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up under the project root.
pub const PROJECT_CONFIG_FILE: &str = "codewatch.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CODEWATCH_*`)
/// 3. Project config (`codewatch.toml` in project root)
/// 4. User config (`~/.codewatch/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CodewatchConfig {
    pub detection: DetectionConfig,
    pub extraction: ExtractionConfig,
    pub repository: RepositoryConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub detection_min_confidence: Option<f64>,
    pub extraction_min_confidence: Option<f64>,
    pub cross_artifact: Option<bool>,
    pub repository_backend: Option<String>,
    pub repository_path: Option<String>,
}

impl CodewatchConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // User config: a parse error is fatal, an unreadable file is not.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &CodewatchConfig) -> Result<(), ConfigError> {
        check_threshold(
            "detection.min_confidence",
            config.detection.min_confidence,
        )?;
        check_threshold(
            "extraction.min_confidence",
            config.extraction.min_confidence,
        )?;
        if config.detection.disabled_detectors.iter().any(|d| d.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "detection.disabled_detectors".to_string(),
                message: "detector ids cannot be empty".to_string(),
            });
        }
        if config.detection.frameworks.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "detection.frameworks".to_string(),
                message: "framework names cannot be empty".to_string(),
            });
        }

        let backend = config.repository.effective_backend()?;
        if backend == RepositoryBackend::Sqlite {
            let has_path = config
                .repository
                .path
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty());
            if !has_path {
                return Err(ConfigError::ValidationFailed {
                    field: "repository.path".to_string(),
                    message: "required when backend is 'sqlite'".to_string(),
                });
            }
        }
        if config.repository.read_pool_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "repository.read_pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.codewatch/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".codewatch").join("config.toml"))
    }

    /// Merge a TOML file into the existing config. Unknown keys are ignored.
    fn merge_toml_file(config: &mut CodewatchConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CodewatchConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; set values in `other` win.
    fn merge(base: &mut CodewatchConfig, other: &CodewatchConfig) {
        // Detection
        if other.detection.min_confidence.is_some() {
            base.detection.min_confidence = other.detection.min_confidence;
        }
        if !other.detection.disabled_detectors.is_empty() {
            base.detection.disabled_detectors = other.detection.disabled_detectors.clone();
        }
        if !other.detection.frameworks.is_empty() {
            base.detection.frameworks = other.detection.frameworks.clone();
        }

        // Extraction
        if other.extraction.min_confidence.is_some() {
            base.extraction.min_confidence = other.extraction.min_confidence;
        }
        if other.extraction.cross_artifact.is_some() {
            base.extraction.cross_artifact = other.extraction.cross_artifact;
        }

        // Repository
        if other.repository.backend.is_some() {
            base.repository.backend = other.repository.backend.clone();
        }
        if other.repository.path.is_some() {
            base.repository.path = other.repository.path.clone();
        }
        if other.repository.read_pool_size.is_some() {
            base.repository.read_pool_size = other.repository.read_pool_size;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CODEWATCH_DETECTION_MIN_CONFIDENCE`, `CODEWATCH_REPOSITORY_PATH`, etc.
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(config: &mut CodewatchConfig) {
        if let Ok(val) = std::env::var("CODEWATCH_DETECTION_MIN_CONFIDENCE") {
            if let Ok(v) = val.parse::<f64>() {
                config.detection.min_confidence = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CODEWATCH_DETECTION_DISABLED_DETECTORS") {
            config.detection.disabled_detectors = split_list(&val);
        }
        if let Ok(val) = std::env::var("CODEWATCH_DETECTION_FRAMEWORKS") {
            config.detection.frameworks = split_list(&val);
        }
        if let Ok(val) = std::env::var("CODEWATCH_EXTRACTION_MIN_CONFIDENCE") {
            if let Ok(v) = val.parse::<f64>() {
                config.extraction.min_confidence = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CODEWATCH_EXTRACTION_CROSS_ARTIFACT") {
            if let Ok(v) = val.parse::<bool>() {
                config.extraction.cross_artifact = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CODEWATCH_REPOSITORY_BACKEND") {
            config.repository.backend = Some(val);
        }
        if let Ok(val) = std::env::var("CODEWATCH_REPOSITORY_PATH") {
            config.repository.path = Some(val);
        }
        if let Ok(val) = std::env::var("CODEWATCH_REPOSITORY_READ_POOL_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.repository.read_pool_size = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CodewatchConfig, cli: &CliOverrides) {
        if let Some(v) = cli.detection_min_confidence {
            config.detection.min_confidence = Some(v);
        }
        if let Some(v) = cli.extraction_min_confidence {
            config.extraction.min_confidence = Some(v);
        }
        if let Some(v) = cli.cross_artifact {
            config.extraction.cross_artifact = Some(v);
        }
        if let Some(ref v) = cli.repository_backend {
            config.repository.backend = Some(v.clone());
        }
        if let Some(ref v) = cli.repository_path {
            config.repository.path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn check_threshold(field: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be between 0.0 and 1.0".to_string(),
        }),
        _ => Ok(()),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
