//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec for per-pattern relation adjacency (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
