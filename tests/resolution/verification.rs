//! Pacts selected for provider verification

use crate::common::*;

#[test]
fn without_selectors_returns_latest_per_consumer() {
    let ledger = TestLedger::new();
    ledger.publish("Foo", "1", "Bar", json!({"v": 1}));
    ledger.publish("Foo", "2", "Bar", json!({"v": 2}));
    ledger.publish("Baz", "1", "Bar", json!({"b": 1}));

    let selected = ledger.db.resolver().for_verification("Bar", &[]);
    let summary: Vec<(&str, &str)> = selected
        .iter()
        .map(|v| (v.pact.consumer_name(), v.pact.consumer_version_number()))
        .collect();
    assert_eq!(summary, vec![("Baz", "1"), ("Foo", "2")]);
    assert!(selected.iter().all(|v| !v.wip && !v.pending));
}

#[test]
fn latest_selectors_select_per_tag_and_merge() {
    let ledger = TestLedger::new();
    ledger.version("Foo", "1", &["prod"]);
    ledger.version("Foo", "2", &["prod", "main"]);
    ledger.version("Foo", "3", &["feat"]);
    ledger.publish("Foo", "1", "Bar", json!({"v": 1}));
    ledger.publish("Foo", "2", "Bar", json!({"v": 2}));
    ledger.publish("Foo", "3", "Bar", json!({"v": 3}));

    let selectors = vec![
        ConsumerVersionSelector::latest_for_tag("prod"),
        ConsumerVersionSelector::latest_for_tag("main"),
    ];
    let selected = ledger.db.resolver().for_verification("Bar", &selectors);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].pact.consumer_version_number(), "2");
    assert_eq!(selected[0].head_consumer_tag_names, vec!["prod", "main"]);
}

#[test]
fn selectors_without_latest_select_nothing() {
    let ledger = TestLedger::new();
    ledger.version("Foo", "1", &["prod"]);
    ledger.publish("Foo", "1", "Bar", json!({"v": 1}));

    let selectors = vec![ConsumerVersionSelector {
        tag: Some("prod".to_string()),
        latest: false,
    }];
    assert!(ledger
        .db
        .resolver()
        .for_verification("Bar", &selectors)
        .is_empty());
}

#[test]
fn first_verification_is_attached() {
    let ledger = TestLedger::new();
    let foo1 = ledger.at(1).publish("Foo", "1", "Bar", json!({"v": 1}));
    ledger.at(2).verify(&foo1, "Bar", "1", &[], false);
    ledger.at(3).verify(&foo1, "Bar", "2", &[], true);

    let selected = ledger.db.resolver().for_verification("Bar", &[]);
    let first = selected[0].first_verification.as_ref().unwrap();
    assert!(!first.success);
    assert_eq!(first.created_at, t(2));
    assert_eq!(ledger.db.verifications_for(foo1.content_id).len(), 2);
}
