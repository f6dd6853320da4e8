//! PatternRepository contract.

use crate::entities::{Pattern, PatternRelation};
use crate::errors::RepositoryError;
use crate::repository::{AnalysisBatch, PatternFilter, PatternPage, PatternQuery, RelationDirection};
use crate::types::{PatternId, RelationId};

/// Queryable store of patterns and relations; the single consistency
/// boundary of the pattern graph.
///
/// The repository is the sole arbiter of id uniqueness and referential
/// integrity. Every write is atomic with respect to its own checks: two
/// concurrent inserts of one id cannot both succeed, and a relation insert
/// never observes a half-applied delete. A failed write changes nothing.
///
/// Delete policy: **reject**. `delete_pattern` fails with
/// `RepositoryError::WouldOrphan` while any relation references the
/// pattern; callers remove those relations first.
pub trait PatternRepository: Send + Sync {
    /// Fails with `Duplicate` if the id is already present.
    fn add_pattern(&self, pattern: Pattern) -> Result<(), RepositoryError>;

    /// Fails with `MissingEndpoints` if either endpoint is absent (checked
    /// first), or `Duplicate` if the relation id is already present.
    fn add_relation(&self, relation: PatternRelation) -> Result<(), RepositoryError>;

    /// Insert one analysis unit atomically: every pattern and relation in the
    /// batch is stored, or none is. Relations may reference patterns of the
    /// same batch.
    fn commit(&self, batch: AnalysisBatch) -> Result<(), RepositoryError>;

    /// Fails with `NotFound` if absent.
    fn get_pattern(&self, id: &PatternId) -> Result<Pattern, RepositoryError>;

    /// Fails with `NotFound` if absent.
    fn get_relation(&self, id: &RelationId) -> Result<PatternRelation, RepositoryError>;

    /// One keyset page of patterns matching `filter`, in insertion order,
    /// starting after the cursor `after` (`None` = from the beginning).
    fn find_patterns_page(
        &self,
        filter: &PatternFilter,
        after: Option<u64>,
        limit: usize,
    ) -> Result<PatternPage, RepositoryError>;

    /// Relations touching a pattern, in insertion order. Fails with
    /// `NotFound` if the pattern is absent.
    fn get_relations(
        &self,
        pattern_id: &PatternId,
        direction: RelationDirection,
    ) -> Result<Vec<PatternRelation>, RepositoryError>;

    /// Fails with `NotFound` if absent, `WouldOrphan` if still referenced.
    fn delete_pattern(&self, id: &PatternId) -> Result<(), RepositoryError>;

    /// Fails with `NotFound` if absent.
    fn delete_relation(&self, id: &RelationId) -> Result<(), RepositoryError>;

    fn pattern_count(&self) -> Result<usize, RepositoryError>;

    fn relation_count(&self) -> Result<usize, RepositoryError>;
}

/// Query helpers available on every repository, including trait objects.
pub trait PatternRepositoryExt: PatternRepository {
    /// Lazy, restartable sequence of patterns matching `filter`, in insertion
    /// order. Unset filter fields do not constrain.
    fn find_patterns(&self, filter: PatternFilter) -> PatternQuery<'_, Self> {
        PatternQuery::new(self, filter)
    }
}

impl<R: PatternRepository + ?Sized> PatternRepositoryExt for R {}
