//! CodewatchErrorCode trait and the stable code strings.

/// Structured error code for every Codewatch error enum.
///
/// Codes are stable across releases so downstream tools can match on them
/// without parsing messages.
pub trait CodewatchErrorCode {
    /// Returns the error code string (e.g., "NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const DETECTION_ERROR: &str = "DETECTION_ERROR";
pub const EXTRACTION_ERROR: &str = "EXTRACTION_ERROR";
pub const REPOSITORY_ERROR: &str = "REPOSITORY_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const DUPLICATE: &str = "DUPLICATE";
pub const REFERENTIAL_INTEGRITY: &str = "REFERENTIAL_INTEGRITY";
pub const UNSUPPORTED_FRAMEWORK: &str = "UNSUPPORTED_FRAMEWORK";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
