//! distinct_previous: nearest earlier pact with different content

use crate::common::*;
use pactledger::ContentDiffer;

#[test]
fn skips_versions_with_identical_content() {
    let ledger = TestLedger::new();
    ledger.publish("Foo", "1", "Bar", json!({"a": 1}));
    ledger.publish("Foo", "2", "Bar", json!({"a": 2}));
    ledger.publish("Foo", "3", "Bar", json!({"a": 2}));
    let foo4 = ledger.publish("Foo", "4", "Bar", json!({"a": 2}));
    let resolver = ledger.db.resolver();

    let start = ledger.pact(&foo4);
    let found = resolver.distinct_previous(&start).unwrap();
    assert_eq!(found.consumer_version_number(), "1");
    assert!(pactledger::JsonDiffer.differs(&start.content, &found.content, false));

    // everything strictly between is content-identical to the start
    let mut step = resolver.previous(&start, &TagFilter::Any).unwrap();
    while step.consumer_version_order() > found.consumer_version_order() {
        assert_eq!(step.content_sha, start.content_sha);
        step = resolver.previous(&step, &TagFilter::Any).unwrap();
    }
}

#[test]
fn none_without_earlier_difference() {
    let ledger = TestLedger::new();
    let foo1 = ledger.publish("Foo", "1", "Bar", json!({"a": 1}));
    let foo2 = ledger.publish("Foo", "2", "Bar", json!({"a": 1}));
    let resolver = ledger.db.resolver();

    assert!(resolver.distinct_previous(&ledger.pact(&foo1)).is_none());
    assert!(resolver.distinct_previous(&ledger.pact(&foo2)).is_none());
}

#[test]
fn immediate_difference_is_returned() {
    let ledger = TestLedger::new();
    ledger.publish("Foo", "1", "Bar", json!({"a": 1}));
    let foo2 = ledger.publish("Foo", "2", "Bar", json!({"a": 2}));
    let found = ledger
        .db
        .resolver()
        .distinct_previous(&ledger.pact(&foo2))
        .unwrap();
    assert_eq!(found.consumer_version_number(), "1");
}

#[test]
fn ignores_other_consumers_and_providers() {
    let ledger = TestLedger::new();
    ledger.publish("Other", "1", "Bar", json!({"a": 1}));
    ledger.publish("Foo", "1", "Baz", json!({"a": 1}));
    let foo2 = ledger.publish("Foo", "2", "Bar", json!({"a": 2}));
    assert!(ledger
        .db
        .resolver()
        .distinct_previous(&ledger.pact(&foo2))
        .is_none());
}

#[test]
fn unexpected_keys_count_as_difference_by_default() {
    let ledger = TestLedger::new();
    ledger.publish("Foo", "1", "Bar", json!({"a": 1, "extra": true}));
    let foo2 = ledger.publish("Foo", "2", "Bar", json!({"a": 1}));
    let found = ledger
        .db
        .resolver()
        .distinct_previous(&ledger.pact(&foo2))
        .unwrap();
    assert_eq!(found.consumer_version_number(), "1");
}

#[test]
fn allow_unexpected_keys_config_relaxes_diff() {
    let ledger = TestLedger::with_config(LedgerConfig {
        allow_unexpected_keys: true,
        ..LedgerConfig::default()
    });
    ledger.publish("Foo", "1", "Bar", json!({"a": 1, "extra": true}));
    let foo2 = ledger.publish("Foo", "2", "Bar", json!({"a": 1}));
    assert!(ledger
        .db
        .resolver()
        .distinct_previous(&ledger.pact(&foo2))
        .is_none());
}

#[test]
fn long_identical_history_terminates() {
    let ledger = TestLedger::new();
    ledger.publish("Foo", "0", "Bar", json!({"a": 0}));
    let mut last = None;
    for n in 1..=200 {
        last = Some(ledger.publish("Foo", &n.to_string(), "Bar", json!({"a": 1})));
    }
    let start = ledger.pact(&last.unwrap());
    let found = ledger.db.resolver().distinct_previous(&start).unwrap();
    assert_eq!(found.consumer_version_number(), "0");
}
