//! Open enumerations: frameworks, pattern types and relation types.
//!
//! Each enum lists the members this build knows about plus an `Other`
//! member carrying the name of anything else. A plugin can name a new
//! framework or category without a code change here, and stored records
//! that mention members unknown to an older build still load.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

macro_rules! define_open_enum {
    (
        $(#[$meta:meta])*
        $name:ident($unknown:ident), $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        #[doc = concat!("Normalized name of a `", stringify!($name), "` unknown to this build.")]
        ///
        /// Only produced by parsing, so it is always trimmed, lowercase and
        /// never the name of a known member: two spellings of one member
        /// always compare equal.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $unknown(String);

        impl $unknown {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $unknown {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A member unknown to this build, kept by its normalized name.
            /// Build it by parsing.
            Other($unknown),
        }

        impl $name {
            /// The snake_case name of this member.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $text, )+
                    Self::Other(name) => name.as_str(),
                }
            }

            /// Every member known to this build.
            pub fn known() -> Vec<$name> {
                vec![$( Self::$variant ),+]
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase();
                if normalized.is_empty() {
                    return Err(ValidationError::InvalidEnumValue {
                        enumeration: $label,
                        message: "name cannot be empty".to_string(),
                    });
                }
                Ok(match normalized.as_str() {
                    $( $text => Self::$variant, )+
                    _ => Self::Other($unknown(normalized)),
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(name) => name.0,
                    known => known.as_str().to_string(),
                }
            }
        }
    };
}

define_open_enum!(
    /// The target ecosystem a pattern was detected against.
    Framework(UnknownFramework), "framework" {
        CosmosSdk => "cosmos_sdk",
        Ethereum => "ethereum",
        Polkadot => "polkadot",
    }
);

define_open_enum!(
    /// Recognized pattern categories.
    PatternType(UnknownPatternType), "pattern_type" {
        /// Owns or guards module state and triggers actions.
        Keeper => "keeper",
        /// Reacts to triggered messages or queries.
        Handler => "handler",
        Validator => "validator",
    }
);

define_open_enum!(
    /// Semantics of a directed edge between two patterns.
    RelationType(UnknownRelationType), "relation_type" {
        Triggers => "triggers",
        Guards => "guards",
        DependsOn => "depends_on",
        Calls => "calls",
        Implements => "implements",
        InheritsFrom => "inherits_from",
    }
);
