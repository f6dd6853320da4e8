//! Tests for the in-memory PatternRepository.

use std::sync::atomic::{AtomicUsize, Ordering};

use codewatch_core::entities::{HandlerDetails, HandlerKind, KeeperDetails, Pattern, PatternRelation};
use codewatch_core::errors::{ErrorKind, RepositoryError};
use codewatch_core::repository::{
    AnalysisBatch, InMemoryPatternRepository, PatternFilter, PatternPage, RelationDirection,
};
use codewatch_core::traits::{PatternRepository, PatternRepositoryExt};
use codewatch_core::types::{Framework, PatternId, PatternType, RelationId, RelationType};
use codewatch_core::value_objects::{ConfidenceScore, PatternLocation, QualifiedName};
use rayon::prelude::*;

fn score(v: f64) -> ConfidenceScore {
    ConfidenceScore::new(v).unwrap()
}

fn keeper(id: &str, name: &str, confidence: f64) -> Pattern {
    Pattern::builder(
        QualifiedName::parse(name).unwrap(),
        PatternLocation::at_line("x/bank/keeper/keeper.go", 10).unwrap(),
        Framework::CosmosSdk,
    )
    .id(PatternId::new(id).unwrap())
    .confidence(score(confidence))
    .keeper(KeeperDetails::new(["balances"], vec![]))
    .unwrap()
}

fn handler(id: &str, name: &str, confidence: f64) -> Pattern {
    Pattern::builder(
        QualifiedName::parse(name).unwrap(),
        PatternLocation::at_line("x/bank/keeper/msg_server.go", 30).unwrap(),
        Framework::CosmosSdk,
    )
    .id(PatternId::new(id).unwrap())
    .confidence(score(confidence))
    .handler(HandlerDetails::new(
        HandlerKind::Message,
        QualifiedName::parse("x.bank.types.MsgSend").unwrap(),
        vec![],
    ))
    .unwrap()
}

fn relation(id: &str, source: &str, target: &str, confidence: f64) -> PatternRelation {
    PatternRelation::with_id(
        RelationId::new(id).unwrap(),
        PatternId::new(source).unwrap(),
        PatternId::new(target).unwrap(),
        RelationType::Triggers,
        score(confidence),
    )
    .unwrap()
}

fn pid(id: &str) -> PatternId {
    PatternId::new(id).unwrap()
}

fn seeded() -> InMemoryPatternRepository {
    let repo = InMemoryPatternRepository::new();
    repo.add_pattern(keeper("K1", "x.bank.keeper.Keeper", 0.9)).unwrap();
    repo.add_pattern(handler("H1", "x.bank.keeper.msgServer.Send", 0.7)).unwrap();
    repo.add_relation(relation("R1", "K1", "H1", 0.6)).unwrap();
    repo
}

/// T0-REPO-01: Keeper triggers handler; outgoing relations of K1 are [R1].
#[test]
fn test_keeper_triggers_handler() {
    let repo = seeded();
    let outgoing = repo.get_relations(&pid("K1"), RelationDirection::Outgoing).unwrap();
    let ids: Vec<_> = outgoing.iter().map(|r| r.id().as_str()).collect();
    assert_eq!(ids, ["R1"]);
    assert!(repo
        .get_relations(&pid("K1"), RelationDirection::Incoming)
        .unwrap()
        .is_empty());
    assert_eq!(
        repo.get_relations(&pid("H1"), RelationDirection::Both).unwrap().len(),
        1
    );
    assert_eq!(repo.get_pattern(&pid("K1")).unwrap().confidence(), score(0.9));
}

/// T0-REPO-02: Second insert of an id fails with Duplicate; one copy remains.
#[test]
fn test_duplicate_pattern() {
    let repo = seeded();
    let err = repo.add_pattern(keeper("K1", "x.other.Keeper", 0.5)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(repo.pattern_count().unwrap(), 2);
    assert_eq!(
        repo.get_pattern(&pid("K1")).unwrap().qualified_name().to_string(),
        "x.bank.keeper.Keeper"
    );

    let err = repo.add_relation(relation("R1", "H1", "K1", 0.1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(repo.relation_count().unwrap(), 1);
}

/// T0-REPO-03: Deleting a referenced pattern is rejected and changes nothing.
#[test]
fn test_delete_referenced_pattern_rejected() {
    let repo = seeded();
    match repo.delete_pattern(&pid("K1")).unwrap_err() {
        RepositoryError::WouldOrphan {
            pattern_id,
            relation_ids,
        } => {
            assert_eq!(pattern_id, "K1");
            assert_eq!(relation_ids, ["R1"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(repo.pattern_count().unwrap(), 2);
    assert_eq!(repo.relation_count().unwrap(), 1);

    repo.delete_relation(&RelationId::new("R1").unwrap()).unwrap();
    repo.delete_pattern(&pid("K1")).unwrap();
    assert_eq!(
        repo.get_pattern(&pid("K1")).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

/// T0-REPO-04: Relations to absent patterns fail and leave counts unchanged.
#[test]
fn test_relation_requires_endpoints() {
    let repo = seeded();
    for (source, target) in [("K1", "H9"), ("K9", "H1"), ("K9", "H9")] {
        let err = repo.add_relation(relation("R2", source, target, 0.3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);
        assert_eq!(repo.pattern_count().unwrap(), 2);
        assert_eq!(repo.relation_count().unwrap(), 1);
    }

    // Endpoint check precedes the duplicate-id check.
    let err = repo.add_relation(relation("R1", "K1", "H9", 0.3)).unwrap_err();
    assert!(matches!(err, RepositoryError::MissingEndpoints { .. }));
}

/// T0-REPO-05: Lookups of absent ids are NotFound.
#[test]
fn test_not_found() {
    let repo = seeded();
    assert_eq!(repo.get_pattern(&pid("nope")).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        repo.get_relation(&RelationId::new("nope").unwrap()).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        repo.get_relations(&pid("nope"), RelationDirection::Both).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(repo.delete_pattern(&pid("nope")).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        repo.delete_relation(&RelationId::new("nope").unwrap()).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

/// T0-REPO-06: A batch commits entirely or not at all.
#[test]
fn test_commit_is_atomic() {
    let repo = seeded();

    let ok = AnalysisBatch::new(
        vec![keeper("K2", "x.staking.Keeper", 0.8), handler("H2", "x.staking.Delegate", 0.8)],
        vec![relation("R2", "K2", "H2", 0.5), relation("R3", "K1", "H2", 0.5)],
    );
    repo.commit(ok).unwrap();
    assert_eq!(repo.pattern_count().unwrap(), 4);
    assert_eq!(repo.relation_count().unwrap(), 3);

    let bad = AnalysisBatch::new(
        vec![keeper("K3", "x.gov.Keeper", 0.8)],
        vec![relation("R4", "K3", "H404", 0.5)],
    );
    assert_eq!(repo.commit(bad).unwrap_err().kind(), ErrorKind::ReferentialIntegrity);
    assert_eq!(repo.pattern_count().unwrap(), 4);
    assert_eq!(repo.get_pattern(&pid("K3")).unwrap_err().kind(), ErrorKind::NotFound);

    let repeated = AnalysisBatch::new(
        vec![keeper("K5", "a.K", 0.8), keeper("K5", "b.K", 0.8)],
        vec![],
    );
    assert_eq!(repo.commit(repeated).unwrap_err().kind(), ErrorKind::Duplicate);
    assert_eq!(repo.pattern_count().unwrap(), 4);
}

/// T0-REPO-07: Filters constrain by framework, type, name prefix and confidence.
#[test]
fn test_find_patterns_filters() {
    let repo = seeded();
    repo.add_pattern(keeper("K2", "x.staking.keeper.Keeper", 0.4)).unwrap();

    let keepers = repo
        .find_patterns(PatternFilter::all().pattern_type(PatternType::Keeper))
        .collect_all()
        .unwrap();
    assert_eq!(keepers.len(), 2);

    let bank = repo
        .find_patterns(
            PatternFilter::all().qualified_name_prefix(QualifiedName::parse("x.bank").unwrap()),
        )
        .collect_all()
        .unwrap();
    assert_eq!(bank.len(), 2);

    let confident = repo
        .find_patterns(PatternFilter::all().min_confidence(score(0.7)))
        .collect_all()
        .unwrap();
    let ids: Vec<_> = confident.iter().map(|p| p.id().as_str()).collect();
    assert_eq!(ids, ["K1", "H1"]);

    assert!(repo
        .find_patterns(PatternFilter::all().framework(Framework::Ethereum))
        .collect_all()
        .unwrap()
        .is_empty());
}

/// T0-REPO-08: Identical queries yield identical, insertion-ordered sequences,
/// and a query restarts from the beginning on every pass.
#[test]
fn test_find_patterns_idempotent_and_restartable() {
    let repo = InMemoryPatternRepository::new();
    for i in 0..25 {
        repo.add_pattern(keeper(&format!("K{i:02}"), &format!("x.m{i}.Keeper"), 0.5))
            .unwrap();
    }

    let first: Vec<_> = repo.find_patterns(PatternFilter::all()).collect_all().unwrap();
    let second: Vec<_> = repo.find_patterns(PatternFilter::all()).collect_all().unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0].id().as_str(), "K00");
    assert_eq!(first[24].id().as_str(), "K24");

    let query = repo.find_patterns(PatternFilter::all()).page_size(4);
    let partial: Vec<_> = query.iter().take(3).map(Result::unwrap).collect();
    let full: Vec<_> = query.iter().map(Result::unwrap).collect();
    assert_eq!(partial[..], full[..3]);
    assert_eq!(full, first);
}

struct CountingRepo {
    inner: InMemoryPatternRepository,
    pages: AtomicUsize,
}

impl PatternRepository for CountingRepo {
    fn add_pattern(&self, p: Pattern) -> Result<(), RepositoryError> {
        self.inner.add_pattern(p)
    }
    fn add_relation(&self, r: PatternRelation) -> Result<(), RepositoryError> {
        self.inner.add_relation(r)
    }
    fn commit(&self, b: AnalysisBatch) -> Result<(), RepositoryError> {
        self.inner.commit(b)
    }
    fn get_pattern(&self, id: &PatternId) -> Result<Pattern, RepositoryError> {
        self.inner.get_pattern(id)
    }
    fn get_relation(&self, id: &RelationId) -> Result<PatternRelation, RepositoryError> {
        self.inner.get_relation(id)
    }
    fn find_patterns_page(
        &self,
        filter: &PatternFilter,
        after: Option<u64>,
        limit: usize,
    ) -> Result<PatternPage, RepositoryError> {
        self.pages.fetch_add(1, Ordering::SeqCst);
        self.inner.find_patterns_page(filter, after, limit)
    }
    fn get_relations(
        &self,
        id: &PatternId,
        d: RelationDirection,
    ) -> Result<Vec<PatternRelation>, RepositoryError> {
        self.inner.get_relations(id, d)
    }
    fn delete_pattern(&self, id: &PatternId) -> Result<(), RepositoryError> {
        self.inner.delete_pattern(id)
    }
    fn delete_relation(&self, id: &RelationId) -> Result<(), RepositoryError> {
        self.inner.delete_relation(id)
    }
    fn pattern_count(&self) -> Result<usize, RepositoryError> {
        self.inner.pattern_count()
    }
    fn relation_count(&self) -> Result<usize, RepositoryError> {
        self.inner.relation_count()
    }
}

/// T0-REPO-09: Pages are fetched only as the iterator advances.
#[test]
fn test_find_patterns_is_lazy() {
    let repo = CountingRepo {
        inner: InMemoryPatternRepository::new(),
        pages: AtomicUsize::new(0),
    };
    for i in 0..100 {
        repo.add_pattern(keeper(&format!("K{i}"), "x.bank.Keeper", 0.5)).unwrap();
    }

    let query = repo.find_patterns(PatternFilter::all()).page_size(10);
    assert_eq!(repo.pages.load(Ordering::SeqCst), 0);
    let first_five: Vec<_> = query.iter().take(5).collect();
    assert_eq!(first_five.len(), 5);
    assert_eq!(repo.pages.load(Ordering::SeqCst), 1);

    assert_eq!(query.iter().count(), 100);
    assert_eq!(repo.pages.load(Ordering::SeqCst), 11);
}

/// T0-REPO-10: Works through a trait object.
#[test]
fn test_trait_object_query() {
    let repo: Box<dyn PatternRepository> = Box::new(seeded());
    let all = repo.find_patterns(PatternFilter::all()).collect_all().unwrap();
    assert_eq!(all.len(), 2);
}

/// T0-REPO-11: Concurrent inserts of one id: exactly one succeeds.
#[test]
fn test_concurrent_duplicate_inserts() {
    let repo = InMemoryPatternRepository::new();
    let outcomes: Vec<_> = (0..64)
        .into_par_iter()
        .map(|_| repo.add_pattern(keeper("K1", "x.bank.Keeper", 0.9)))
        .collect();
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::Duplicate));
    assert_eq!(repo.pattern_count().unwrap(), 1);
}

/// T0-REPO-12: Concurrent distinct inserts all land.
#[test]
fn test_concurrent_distinct_inserts() {
    let repo = InMemoryPatternRepository::new();
    (0..200).into_par_iter().for_each(|i| {
        repo.add_pattern(keeper(&format!("K{i}"), "x.bank.Keeper", 0.5)).unwrap();
    });
    assert_eq!(repo.pattern_count().unwrap(), 200);
    assert_eq!(
        repo.find_patterns(PatternFilter::all()).collect_all().unwrap().len(),
        200
    );
}
