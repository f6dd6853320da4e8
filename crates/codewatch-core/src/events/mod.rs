//! Pipeline lifecycle events.
//! Handlers override only what they need; dispatch is synchronous.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::PatternEventHandler;
pub use types::*;
