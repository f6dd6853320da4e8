//! Repository building blocks: filters, atomic batches, lazy queries and
//! the in-memory backend.

pub mod batch;
pub mod filter;
pub mod memory;
pub mod query;

pub use batch::AnalysisBatch;
pub use filter::{PatternFilter, RelationDirection};
pub use memory::InMemoryPatternRepository;
pub use query::{PatternIter, PatternPage, PatternQuery, DEFAULT_PAGE_SIZE};
