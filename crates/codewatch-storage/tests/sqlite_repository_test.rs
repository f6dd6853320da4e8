//! Tests for the SQLite PatternRepository.

use std::path::Path;

use codewatch_core::entities::{HandlerDetails, HandlerKind, KeeperDetails, Pattern, PatternRelation};
use codewatch_core::errors::{ErrorKind, RepositoryError};
use codewatch_core::repository::{
    AnalysisBatch, InMemoryPatternRepository, PatternFilter, RelationDirection,
};
use codewatch_core::traits::{PatternRepository, PatternRepositoryExt};
use codewatch_core::types::{Framework, PatternId, PatternType, RelationId, RelationType};
use codewatch_core::value_objects::{ConfidenceScore, PatternLocation, QualifiedName};
use codewatch_storage::SqlitePatternRepository;
use rayon::prelude::*;
use tempfile::TempDir;

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
    .keeper(KeeperDetails::new(
        ["balances", "supply"],
        vec![QualifiedName::parse("x.auth.keeper.AccountKeeper").unwrap()],
    ))
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
    .with_metadata("reference", serde_json::json!("x.bank.keeper.Keeper"))
}

fn pid(id: &str) -> PatternId {
    PatternId::new(id).unwrap()
}

fn seed(repo: &dyn PatternRepository) {
    repo.add_pattern(keeper("K1", "x.bank.keeper.Keeper", 0.9)).unwrap();
    repo.add_pattern(handler("H1", "x.bank.keeper.msgServer.Send", 0.7)).unwrap();
    repo.add_relation(relation("R1", "K1", "H1", 0.6)).unwrap();
}

fn file_repo(dir: &Path) -> SqlitePatternRepository {
    SqlitePatternRepository::open(&dir.join("codewatch.db")).unwrap()
}

/// T1-SQL-01: Keeper triggers handler; stored records come back equal.
#[test]
fn test_keeper_triggers_handler() {
    let repo = SqlitePatternRepository::open_in_memory().unwrap();
    seed(&repo);

    let outgoing = repo.get_relations(&pid("K1"), RelationDirection::Outgoing).unwrap();
    assert_eq!(outgoing, vec![relation("R1", "K1", "H1", 0.6)]);
    assert!(repo
        .get_relations(&pid("K1"), RelationDirection::Incoming)
        .unwrap()
        .is_empty());
    assert_eq!(
        repo.get_relations(&pid("H1"), RelationDirection::Both).unwrap().len(),
        1
    );
    assert_eq!(
        repo.get_pattern(&pid("K1")).unwrap(),
        keeper("K1", "x.bank.keeper.Keeper", 0.9)
    );
    assert_eq!(
        repo.get_relations(&pid("K9"), RelationDirection::Both)
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

/// T1-SQL-02: Duplicate ids are rejected and the first copy survives.
#[test]
fn test_duplicate_ids() {
    let repo = SqlitePatternRepository::open_in_memory().unwrap();
    seed(&repo);

    let err = repo.add_pattern(keeper("K1", "x.other.Keeper", 0.5)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(
        repo.get_pattern(&pid("K1")).unwrap().qualified_name().to_string(),
        "x.bank.keeper.Keeper"
    );

    let err = repo.add_relation(relation("R1", "H1", "K1", 0.1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(repo.pattern_count().unwrap(), 2);
    assert_eq!(repo.relation_count().unwrap(), 1);
}

/// T1-SQL-03: Dangling relations are rejected before the duplicate check.
#[test]
fn test_relation_requires_endpoints() {
    let repo = SqlitePatternRepository::open_in_memory().unwrap();
    seed(&repo);

    match repo.add_relation(relation("R1", "K1", "H9", 0.3)).unwrap_err() {
        RepositoryError::MissingEndpoints {
            relation_id,
            missing,
        } => {
            assert_eq!(relation_id, "R1");
            assert_eq!(missing, ["H9"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(repo.relation_count().unwrap(), 1);
}

/// T1-SQL-04: Delete policy is reject; removing the relation first works.
#[test]
fn test_delete_referenced_pattern_rejected() {
    let repo = SqlitePatternRepository::open_in_memory().unwrap();
    seed(&repo);

    match repo.delete_pattern(&pid("H1")).unwrap_err() {
        RepositoryError::WouldOrphan { relation_ids, .. } => assert_eq!(relation_ids, ["R1"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(repo.pattern_count().unwrap(), 2);

    let r1 = RelationId::new("R1").unwrap();
    repo.delete_relation(&r1).unwrap();
    assert_eq!(repo.delete_relation(&r1).unwrap_err().kind(), ErrorKind::NotFound);
    repo.delete_pattern(&pid("H1")).unwrap();
    assert_eq!(repo.delete_pattern(&pid("H1")).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(repo.pattern_count().unwrap(), 1);
    assert_eq!(repo.relation_count().unwrap(), 0);
}

/// T1-SQL-05: A batch with one bad relation commits nothing.
#[test]
fn test_commit_is_atomic() {
    let repo = SqlitePatternRepository::open_in_memory().unwrap();
    seed(&repo);

    let mut batch = AnalysisBatch::new(
        vec![
            keeper("K2", "x.staking.keeper.Keeper", 0.8),
            handler("H2", "x.staking.keeper.msgServer.Delegate", 0.8),
        ],
        vec![
            relation("R2", "K2", "H2", 0.5),
            relation("R3", "K2", "H9", 0.5),
        ],
    );

    let err = repo.commit(batch.clone()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);
    assert_eq!(repo.pattern_count().unwrap(), 2);
    assert_eq!(repo.relation_count().unwrap(), 1);
    assert_eq!(repo.get_pattern(&pid("K2")).unwrap_err().kind(), ErrorKind::NotFound);

    batch.relations.pop();
    repo.commit(batch).unwrap();
    assert_eq!(repo.pattern_count().unwrap(), 4);
    assert_eq!(repo.relation_count().unwrap(), 2);
}

/// T1-SQL-06: Filters and keyset pages agree with the in-memory semantics.
#[test]
fn test_filtered_paged_queries() {
    let repo = SqlitePatternRepository::open_in_memory().unwrap();
    for i in 0..25 {
        repo.add_pattern(keeper(
            &format!("K{i}"),
            &format!("x.mod{}.keeper.Keeper{i}", i % 3),
            0.5 + f64::from(i) / 100.0,
        ))
        .unwrap();
    }
    repo.add_pattern(handler("H1", "x.mod0x.Handler", 0.95)).unwrap();

    let all: Vec<_> = repo
        .find_patterns(PatternFilter::all())
        .page_size(4)
        .collect_all()
        .unwrap();
    assert_eq!(all.len(), 26);
    assert_eq!(all[0].id().as_str(), "K0");
    assert_eq!(all[25].id().as_str(), "H1");

    // Prefix is segment-wise: x.mod0 does not match x.mod0x.
    let mod0 = PatternFilter::all()
        .qualified_name_prefix(QualifiedName::parse("x.mod0").unwrap());
    assert_eq!(repo.find_patterns(mod0).collect_all().unwrap().len(), 9);

    let strong = PatternFilter::all()
        .pattern_type(PatternType::Keeper)
        .min_confidence(score(0.705));
    let ids: Vec<_> = repo
        .find_patterns(strong)
        .collect_all()
        .unwrap()
        .into_iter()
        .map(|p| p.id().to_string())
        .collect();
    assert_eq!(ids, ["K21", "K22", "K23", "K24"]);

    let page = repo.find_patterns_page(&PatternFilter::all(), None, 26).unwrap();
    assert_eq!(page.items.len(), 26);
    assert_eq!(page.next_cursor, None);

    let other = PatternFilter::all().framework(Framework::Ethereum);
    assert!(repo.find_patterns(other).collect_all().unwrap().is_empty());
}

/// T1-SQL-07: Data survives closing and reopening the database file.
#[test]
fn test_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let repo = file_repo(dir.path());
        seed(&repo);
        assert_eq!(repo.database().read_pool_size(), 4);
    }

    let repo = file_repo(dir.path());
    assert_eq!(repo.pattern_count().unwrap(), 2);
    assert_eq!(repo.relation_count().unwrap(), 1);
    assert_eq!(
        repo.get_relation(&RelationId::new("R1").unwrap()).unwrap(),
        relation("R1", "K1", "H1", 0.6)
    );

    // Insertion order continues after reopen.
    repo.add_pattern(keeper("K2", "x.staking.keeper.Keeper", 0.8)).unwrap();
    let ids: Vec<_> = repo
        .find_patterns(PatternFilter::all())
        .collect_all()
        .unwrap()
        .into_iter()
        .map(|p| p.id().to_string())
        .collect();
    assert_eq!(ids, ["K1", "H1", "K2"]);
}

/// T1-SQL-08: Concurrent inserts of one id: exactly one succeeds.
#[test]
fn test_concurrent_duplicate_inserts() {
    let dir = TempDir::new().unwrap();
    let repo = file_repo(dir.path());

    let results: Vec<_> = (0..16)
        .into_par_iter()
        .map(|i| repo.add_pattern(keeper("K1", &format!("x.race.Keeper{i}"), 0.5)))
        .collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::Duplicate));
    assert_eq!(repo.pattern_count().unwrap(), 1);
}

/// T1-SQL-09: Concurrent readers and writers on a file database.
#[test]
fn test_concurrent_reads_and_writes() {
    let dir = TempDir::new().unwrap();
    let repo = file_repo(dir.path());
    repo.add_pattern(keeper("K0", "x.bank.keeper.Keeper", 0.9)).unwrap();

    (1..=32).into_par_iter().for_each(|i| {
        if i % 2 == 0 {
            repo.add_pattern(keeper(&format!("K{i}"), "x.bank.keeper.Keeper", 0.6))
                .unwrap();
        } else {
            assert_eq!(repo.get_pattern(&pid("K0")).unwrap().id().as_str(), "K0");
        }
    });
    assert_eq!(repo.pattern_count().unwrap(), 17);
}

fn ids_matching(repo: &dyn PatternRepository, filter: PatternFilter) -> Vec<String> {
    repo.find_patterns(filter)
        .collect_all()
        .unwrap()
        .into_iter()
        .map(|p| p.id().to_string())
        .collect()
}

fn pattern_in(id: &str, name: QualifiedName, framework: Framework) -> Pattern {
    Pattern::builder(
        name,
        PatternLocation::at_line("pallets/staking/src/lib.rs", 3).unwrap(),
        framework,
    )
    .id(PatternId::new(id).unwrap())
    .keeper(KeeperDetails::new(["ledger"], vec![]))
    .unwrap()
}

/// T1-SQL-10: Both backends store and reload names and frameworks
/// identically, and agree on prefix and framework filters.
#[test]
fn test_backend_parity_for_names_and_frameworks() {
    let sqlite = SqlitePatternRepository::open_in_memory().unwrap();
    let memory = InMemoryPatternRepository::new();

    let built = QualifiedName::from_segments(["a", " b ", "C"]).unwrap();
    let patterns = vec![
        pattern_in("P1", built.clone(), " Cosmos_SDK ".parse().unwrap()),
        pattern_in("P2", QualifiedName::parse("a.bc.D").unwrap(), "Move".parse().unwrap()),
        pattern_in("P3", QualifiedName::parse("a.b").unwrap(), Framework::Ethereum),
    ];
    for repo in [&sqlite as &dyn PatternRepository, &memory] {
        for pattern in &patterns {
            repo.add_pattern(pattern.clone()).unwrap();
        }
    }

    for pattern in &patterns {
        let reloaded = sqlite.get_pattern(pattern.id()).unwrap();
        assert_eq!(&reloaded, pattern);
        assert_eq!(reloaded, memory.get_pattern(pattern.id()).unwrap());
    }
    assert_eq!(sqlite.get_pattern(&pid("P1")).unwrap().qualified_name(), &built);
    assert_eq!(
        sqlite.get_pattern(&pid("P1")).unwrap().framework(),
        &Framework::CosmosSdk
    );

    let filters = [
        PatternFilter::all().qualified_name_prefix(QualifiedName::parse("a.b").unwrap()),
        PatternFilter::all().qualified_name_prefix(QualifiedName::parse("a").unwrap()),
        PatternFilter::all().framework(Framework::CosmosSdk),
        PatternFilter::all().framework("move".parse().unwrap()),
    ];
    let expected: [&[&str]; 4] = [&["P1", "P3"], &["P1", "P2", "P3"], &["P1"], &["P2"]];
    for (filter, expected) in filters.into_iter().zip(expected) {
        assert_eq!(ids_matching(&sqlite, filter.clone()), expected, "{filter:?}");
        assert_eq!(ids_matching(&memory, filter.clone()), expected, "{filter:?}");
    }
}
