//! Tests for pattern and relation entities.

use codewatch_core::entities::{
    GenericDetails, HandlerDetails, HandlerKind, KeeperDetails, Pattern, PatternDetails,
    PatternRelation,
};
use codewatch_core::errors::ValidationError;
use codewatch_core::types::{Framework, PatternId, PatternType, RelationId, RelationType};
use codewatch_core::value_objects::{ConfidenceScore, PatternLocation, QualifiedName};

fn qn(s: &str) -> QualifiedName {
    QualifiedName::parse(s).unwrap()
}

fn loc(line: u32) -> PatternLocation {
    PatternLocation::at_line("x/bank/keeper/keeper.go", line).unwrap()
}

/// T0-ENT-01: A keeper carries its store keys and dependencies.
#[test]
fn test_keeper_pattern() {
    let keeper = Pattern::builder(qn("x.bank.keeper.Keeper"), loc(12), Framework::CosmosSdk)
        .confidence(ConfidenceScore::high())
        .keeper(KeeperDetails::new(
            ["balances", "supply"],
            vec![qn("x.auth.keeper.AccountKeeper")],
        ))
        .unwrap();

    assert_eq!(keeper.pattern_type(), &PatternType::Keeper);
    assert_eq!(keeper.confidence(), ConfidenceScore::high());
    let view = keeper.as_keeper().unwrap();
    assert_eq!(view.store_keys(), ["balances", "supply"]);
    assert_eq!(view.dependencies()[0].name(), "AccountKeeper");
    assert_eq!(view.qualified_name().name(), "Keeper");
    assert!(keeper.as_handler().is_none());
}

/// T0-ENT-02: A keeper without store keys is invalid.
#[test]
fn test_keeper_requires_store_key() {
    let err = Pattern::builder(qn("x.bank.Keeper"), loc(1), Framework::CosmosSdk)
        .keeper(KeeperDetails::new(Vec::<String>::new(), vec![]))
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidPattern { .. }));

    let blank = Pattern::builder(qn("x.bank.Keeper"), loc(1), Framework::CosmosSdk)
        .keeper(KeeperDetails::new([" "], vec![]))
        .unwrap_err();
    assert!(matches!(blank, ValidationError::InvalidPattern { .. }));
}

/// T0-ENT-03: A handler exposes its kind and message type.
#[test]
fn test_handler_pattern() {
    let handler = Pattern::builder(qn("x.bank.keeper.msgServer.Send"), loc(40), Framework::CosmosSdk)
        .handler(HandlerDetails::new(
            HandlerKind::Message,
            qn("x.bank.types.MsgSend"),
            vec![qn("x.bank.keeper.Keeper")],
        ))
        .unwrap();

    let view = handler.as_handler().unwrap();
    assert_eq!(view.kind(), HandlerKind::Message);
    assert_eq!(view.message_type().to_string(), "x.bank.types.MsgSend");
    assert_eq!(handler.referenced_names().len(), 1);
    assert_eq!(HandlerKind::Query.to_string(), "query");
}

/// T0-ENT-04: Variant payloads only describe matching pattern types.
#[test]
fn test_details_must_match_type() {
    let details = PatternDetails::Keeper(KeeperDetails::new(["k"], vec![]));
    let err = Pattern::builder(qn("a.B"), loc(1), Framework::Ethereum)
        .build(PatternType::Handler, details)
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidPattern { .. }));

    assert!(Pattern::builder(qn("a.B"), loc(1), Framework::Ethereum)
        .generic(PatternType::Keeper, GenericDetails::new())
        .is_err());
}

/// T0-ENT-05: Generic payloads serve other pattern types.
#[test]
fn test_generic_pattern() {
    let validator = Pattern::builder(qn("staking.Validator"), loc(3), Framework::Polkadot)
        .generic(
            PatternType::Validator,
            GenericDetails::new()
                .with_attribute("pallet", serde_json::json!("staking"))
                .with_reference(qn("staking.Ledger")),
        )
        .unwrap();
    assert_eq!(validator.referenced_names()[0].to_string(), "staking.Ledger");

    let custom = Pattern::builder(qn("a.B"), loc(1), "move".parse::<Framework>().unwrap())
        .generic("module".parse::<PatternType>().unwrap(), GenericDetails::new())
        .unwrap();
    assert_eq!(custom.pattern_type().as_str(), "module");
}

/// T0-ENT-06: Builders generate fresh ids; explicit ids are kept.
#[test]
fn test_pattern_ids() {
    let build = || {
        Pattern::builder(qn("a.K"), loc(1), Framework::CosmosSdk)
            .keeper(KeeperDetails::new(["k"], vec![]))
            .unwrap()
    };
    assert_ne!(build().id(), build().id());

    let fixed = Pattern::builder(qn("a.K"), loc(1), Framework::CosmosSdk)
        .id(PatternId::new("K1").unwrap())
        .keeper(KeeperDetails::new(["k"], vec![]))
        .unwrap();
    assert_eq!(fixed.id().as_str(), "K1");

    let rebuilt = fixed.rebuild().keeper(KeeperDetails::new(["k"], vec![])).unwrap();
    assert_ne!(rebuilt.id(), fixed.id());
    assert_eq!(rebuilt.qualified_name(), fixed.qualified_name());
}

/// T0-ENT-07: Relations cannot link a pattern to itself.
#[test]
fn test_relation_rejects_self_link() {
    let id = PatternId::new("K1").unwrap();
    let err = PatternRelation::new(id.clone(), id, RelationType::Triggers, ConfidenceScore::high())
        .unwrap_err();
    assert!(matches!(err, ValidationError::SelfRelation { .. }));
}

/// T0-ENT-08: Relation accessors and metadata.
#[test]
fn test_relation_fields() {
    let (k, h) = (PatternId::new("K1").unwrap(), PatternId::new("H1").unwrap());
    let r = PatternRelation::with_id(
        RelationId::new("R1").unwrap(),
        k.clone(),
        h.clone(),
        RelationType::Triggers,
        ConfidenceScore::new(0.8).unwrap(),
    )
    .unwrap()
    .with_metadata("via", serde_json::json!("EndBlocker"));

    assert_eq!(r.id().as_str(), "R1");
    assert_eq!(r.source_pattern_id(), &k);
    assert_eq!(r.target_pattern_id(), &h);
    assert!(r.touches(&k) && r.touches(&h));
    assert_eq!(r.metadata()["via"], "EndBlocker");
}

/// T0-ENT-09: Deserialization re-validates entities.
#[test]
fn test_entity_serde_validates() {
    let keeper = Pattern::builder(qn("x.bank.Keeper"), loc(5), Framework::CosmosSdk)
        .keeper(KeeperDetails::new(["balances"], vec![]))
        .unwrap();
    let json = serde_json::to_value(&keeper).unwrap();
    let back: Pattern = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(back, keeper);

    let mut broken = json;
    broken["details"]["store_keys"] = serde_json::json!([]);
    assert!(serde_json::from_value::<Pattern>(broken).is_err());

    let self_link = serde_json::json!({
        "id": "R1",
        "source_pattern_id": "K1",
        "target_pattern_id": "K1",
        "relation_type": "triggers",
        "confidence": 0.5,
    });
    assert!(serde_json::from_value::<PatternRelation>(self_link).is_err());
}

/// T0-ENT-10: Open enums parse known names and keep unknown ones.
#[test]
fn test_open_enums() {
    assert_eq!("Cosmos_SDK".parse::<Framework>().unwrap(), Framework::CosmosSdk);
    assert_eq!("depends_on".parse::<RelationType>().unwrap(), RelationType::DependsOn);
    let other = "solana".parse::<Framework>().unwrap();
    assert!(!other.is_known());
    assert_eq!(other.to_string(), "solana");
    assert!(matches!(
        "".parse::<PatternType>(),
        Err(ValidationError::InvalidEnumValue { .. })
    ));
}

/// T0-ENT-11: Unknown members are normalized, never alias a known member,
/// and survive serde unchanged.
#[test]
fn test_open_enum_unknown_members_normalized() {
    let other = " Solana ".parse::<Framework>().unwrap();
    assert_eq!(other, "solana".parse::<Framework>().unwrap());
    match &other {
        Framework::Other(name) => assert_eq!(name.as_str(), "solana"),
        known => panic!("unexpected member: {known:?}"),
    }

    // Any spelling of a known member parses to that member.
    for spelling in ["ethereum", "Ethereum", " ETHEREUM "] {
        let parsed = spelling.parse::<Framework>().unwrap();
        assert_eq!(parsed, Framework::Ethereum);
        assert!(parsed.is_known());
    }

    let json = serde_json::to_string(&other).unwrap();
    assert_eq!(json, "\"solana\"");
    assert_eq!(serde_json::from_str::<Framework>(&json).unwrap(), other);
    let known: Framework = serde_json::from_str("\"Ethereum\"").unwrap();
    assert_eq!(known, Framework::Ethereum);
}
