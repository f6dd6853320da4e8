//! Pattern and relation entities.
//!
//! A `Pattern` is one shared-attribute record plus a variant payload
//! (`PatternDetails`). Code that stores or queries patterns only relies on
//! identity, location and confidence, and on the `PatternRole` capability of
//! the payload, so new pattern kinds plug in without touching it.

pub mod generic;
pub mod handler;
pub mod keeper;
pub mod pattern;
pub mod relation;

pub use generic::GenericDetails;
pub use handler::{HandlerDetails, HandlerKind, HandlerPattern};
pub use keeper::{KeeperDetails, KeeperPattern};
pub use pattern::{Pattern, PatternBuilder, PatternDetails, PatternRole};
pub use relation::PatternRelation;
