//! Rule variant resolution, composition and remote application.

use envipath_model::{
    Attributes, FromRecord, MemoryFetcher, ModelError, Package, ParallelCompositeRule,
    ResourceType, Rule, RuleKind, SequentialCompositeRule, SharedFetcher, SimpleRule,
};
use serde_json::{json, Value};
use std::sync::Arc;

const HOST: &str = "http://localhost:8080/";
const PACKAGE: &str = "http://localhost:8080/package/p1";
const SMIRKS: &str = "[H][#8]-[#7:3]=[#6:4]([H])-[$([#1,*]):6]>>[$([#1,*]):6][C:4]#[N:3]";

fn memory() -> (Arc<MemoryFetcher>, SharedFetcher) {
    let memory = Arc::new(MemoryFetcher::new(HOST));
    let shared: SharedFetcher = memory.clone();
    (memory, shared)
}

fn attributes(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("test fixtures are objects"),
    }
}

#[test]
fn test_discriminator_selects_variant() {
    let (_memory, fetcher) = memory();
    let cases = [
        ("simple-rule", RuleKind::Simple),
        ("sequential-rule", RuleKind::Sequential),
        ("parallel-rule", RuleKind::Parallel),
    ];
    for (tag, expected) in cases {
        let rule = Rule::from_attributes(
            &fetcher,
            "rule/1",
            attributes(json!({"identifier": tag, "name": "r"})),
            true,
        )
        .unwrap();
        assert_eq!(rule.kind(), expected);
        assert_eq!(rule.kind().as_str(), tag);
        assert_eq!(rule.resource().kind(), expected.resource_kind());
    }

    let rule = Rule::from_attributes(
        &fetcher,
        "rule/1",
        attributes(json!({"identifier": "sequential-rule"})),
        true,
    )
    .unwrap();
    assert!(matches!(rule, Rule::Sequential(_)));
    assert!(rule.is_composite());
}

#[test]
fn test_unknown_discriminator_is_rejected() {
    let (_memory, fetcher) = memory();
    let err = Rule::from_attributes(
        &fetcher,
        "rule/1",
        attributes(json!({"identifier": "cyclic-rule"})),
        true,
    )
    .unwrap_err();
    match err {
        ModelError::UnknownRuleType(tag) => assert_eq!(tag, "cyclic-rule"),
        other => panic!("expected unknown rule type, got {other:?}"),
    }
}

#[test]
fn test_discriminator_is_not_read_from_identifier_shape() {
    let (_memory, fetcher) = memory();
    let rule = Rule::from_attributes(
        &fetcher,
        "http://localhost:8080/package/p1/simple-rule/9",
        attributes(json!({"identifier": "parallel-rule"})),
        true,
    )
    .unwrap();
    assert_eq!(rule.kind(), RuleKind::Parallel);
}

#[test]
fn test_record_without_discriminator_is_fetched_once() {
    let (memory, fetcher) = memory();
    memory.insert(
        "rule/5",
        json!({"identifier": "simple-rule", "name": "bt0001", "smirks": SMIRKS}),
    );

    let rule = Rule::from_record(&fetcher, &json!({"id": "rule/5", "name": "bt0001"})).unwrap();
    let Rule::Simple(simple) = &rule else {
        panic!("expected a simple rule, got {rule:?}");
    };
    assert_eq!(simple.smirks().unwrap(), SMIRKS);
    assert_eq!(simple.name().unwrap(), "bt0001");
    assert_eq!(memory.fetch_count("rule/5"), 1);
}

#[test]
fn test_composite_rules_materialize_simple_rules() {
    let (memory, fetcher) = memory();
    memory.insert(
        "rule/seq",
        json!({
            "identifier": "sequential-rule",
            "name": "seq",
            "simpleRules": [
                {"id": "rule/a", "name": "a"},
                {"id": "rule/b", "name": "b"}
            ]
        }),
    );
    memory.insert(
        "rule/par",
        json!({
            "identifier": "parallel-rule",
            "name": "par",
            "simpleRules": [{"id": "rule/b", "name": "b"}]
        }),
    );

    let seq = Rule::resolve(&fetcher, "rule/seq").unwrap();
    let par = Rule::resolve(&fetcher, "rule/par").unwrap();

    let seq_rules = seq.simple_rules().unwrap().unwrap();
    let names: Vec<String> = seq_rules.iter().map(|r| r.name().unwrap()).collect();
    assert_eq!(names, vec!["a", "b"]);

    let par_rules = par.simple_rules().unwrap().unwrap();
    assert_eq!(par_rules, vec![SimpleRule::new(fetcher.clone(), "rule/b")]);
    assert!(seq_rules.contains(&par_rules[0]));

    let simple = Rule::from(SimpleRule::new(fetcher, "rule/a"));
    assert!(simple.simple_rules().is_none());
    assert_eq!(memory.total_fetches(), 2);
}

#[test]
fn test_package_rules_resolve_each_variant() {
    let (memory, fetcher) = memory();
    memory.insert(
        format!("{PACKAGE}/rule"),
        json!({
            "rule": [
                {"id": "rule/1", "name": "s", "identifier": "simple-rule"},
                {"id": "rule/2", "name": "q", "identifier": "sequential-rule"},
                {"id": "rule/3", "name": "p", "identifier": "parallel-rule"}
            ]
        }),
    );

    let package = Package::new(fetcher, PACKAGE);
    let kinds: Vec<RuleKind> = package.rules().unwrap().iter().map(Rule::kind).collect();
    assert_eq!(
        kinds,
        vec![RuleKind::Simple, RuleKind::Sequential, RuleKind::Parallel]
    );
}

#[test]
fn test_package_rules_fail_on_unknown_variant() {
    let (memory, fetcher) = memory();
    memory.insert(
        format!("{PACKAGE}/rule"),
        json!({"rule": [{"id": "rule/1", "identifier": "mystery-rule"}]}),
    );
    let package = Package::new(fetcher, PACKAGE);
    assert!(matches!(
        package.rules(),
        Err(ModelError::UnknownRuleType(_))
    ));
}

#[test]
fn test_apply_to_smiles_splits_on_whitespace() {
    let (memory, fetcher) = memory();
    memory.respond("rule/1", "CC(=O)O\n  CCO\tC=O \n\n");

    let rule = SimpleRule::new(fetcher, "rule/1");
    let products = rule.apply_to_smiles("CCCO").unwrap();
    assert_eq!(products, vec!["CC(=O)O", "CCO", "C=O"]);

    let calls = memory.submitted();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].uri, "rule/1");
    assert!(calls[0]
        .payload
        .contains(&("compound".to_string(), "CCCO".to_string())));
    assert!(calls[0]
        .payload
        .contains(&("hiddenMethod".to_string(), "APPLYRULES".to_string())));
}

#[test]
fn test_apply_to_smiles_empty_response() {
    let (memory, fetcher) = memory();
    memory.respond("rule/1", "   \n");
    let rule = Rule::from(ParallelCompositeRule::new(fetcher, "rule/1"));
    assert!(rule.apply_to_smiles("C").unwrap().is_empty());
}

#[test]
fn test_apply_to_smiles_propagates_transport_error() {
    let (_memory, fetcher) = memory();
    let rule = SimpleRule::new(fetcher, "rule/unreachable");
    assert!(matches!(
        rule.apply_to_smiles("C"),
        Err(ModelError::Transport(_))
    ));
}

#[test]
fn test_create_rules_under_package() {
    let (memory, fetcher) = memory();
    let package = Package::new(fetcher, PACKAGE);

    let rule = SimpleRule::create(
        &package,
        SMIRKS,
        Some("ClientRule"),
        Some("A SimpleRule created via the client"),
        None,
        None,
    )
    .unwrap();
    assert_eq!(rule.smirks().unwrap(), SMIRKS);
    assert_eq!(rule.name().unwrap(), "ClientRule");

    let seq =
        SequentialCompositeRule::create(&package, std::slice::from_ref(&rule), Some("seq"), None)
            .unwrap();
    let par = ParallelCompositeRule::create(&package, &[rule.clone()], Some("par"), None).unwrap();
    assert_ne!(seq.id().unwrap(), par.id().unwrap());

    let created = memory.created();
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|call| call.uri == format!("{PACKAGE}/rule")));
    let rule_id = rule.id().unwrap().to_string();
    assert!(created[1]
        .payload
        .contains(&("simpleRules".to_string(), rule_id.clone())));
    assert!(created[2]
        .payload
        .contains(&("ruleType".to_string(), "PARALLEL".to_string())));

    let mut rule = Rule::from(rule);
    rule.delete().unwrap();
    assert_eq!(memory.deleted(), vec![rule_id]);
}
