//! Identifiers, open enumerations and collection aliases.

pub mod collections;
pub mod enums;
pub mod identifiers;

pub use collections::{FxHashMap, FxHashSet, SmallVec4};
pub use enums::{
    Framework, PatternType, RelationType, UnknownFramework, UnknownPatternType, UnknownRelationType,
};
pub use identifiers::{PatternId, RelationId};
