//! Opaque identifiers for patterns and relations.
//!
//! Each ID type is a distinct newtype so a `RelationId` cannot be passed
//! where a `PatternId` is expected. Ids are assigned at creation and never
//! change; `generate()` yields a UUID v4, so repeated calls within one
//! process never collide.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap an externally assigned id. Surrounding whitespace is
            /// trimmed; an empty id is rejected.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::InvalidIdentifier {
                        message: concat!($label, " id cannot be empty").to_string(),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Generate a fresh, process-unique id.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Pattern identifier, unique within a repository.
    PatternId,
    "pattern"
);

define_id!(
    /// Relation identifier, unique within a repository.
    RelationId,
    "relation"
);
