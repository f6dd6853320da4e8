//! Error handling for Codewatch.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Every domain failure maps onto exactly one of eight [`ErrorKind`]s.
//! Callers branch on the kind (or the variant), never on message text.

pub mod codewatch_error;
pub mod config_error;
pub mod detection_error;
pub mod error_code;
pub mod extraction_error;
pub mod kind;
pub mod repository_error;
pub mod validation_error;

pub use codewatch_error::CodewatchError;
pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use error_code::CodewatchErrorCode;
pub use extraction_error::ExtractionError;
pub use kind::ErrorKind;
pub use repository_error::{EntityKind, RepositoryError};
pub use validation_error::ValidationError;
