//! Revision numbering of publications

use crate::common::*;
use proptest::prelude::*;
use std::sync::Arc;

#[test]
fn identical_republish_keeps_revision_and_pointer() {
    let ledger = TestLedger::new();
    let bar = ledger.component("Bar");
    let foo1 = ledger.version("Foo", "1", &[]);

    let r1 = ledger.db.publish(foo1.id, bar.id, json!({"a": 1})).unwrap();
    assert_eq!(r1.revision_number, 1);

    let again = ledger.db.publish(foo1.id, bar.id, json!({"a": 1})).unwrap();
    assert_eq!(again, r1);
    let pointer = ledger
        .db
        .store()
        .read(|c| c.latest().get(&r1.pair()).copied())
        .unwrap();
    assert_eq!(pointer.publication_id, r1.id);

    let r2 = ledger.db.publish(foo1.id, bar.id, json!({"a": 2})).unwrap();
    assert_eq!(r2.revision_number, 2);
    let pointer = ledger
        .db
        .store()
        .read(|c| c.latest().get(&r1.pair()).copied())
        .unwrap();
    assert_eq!(pointer.publication_id, r2.id);
}

#[test]
fn key_order_does_not_change_content_identity() {
    let ledger = TestLedger::new();
    let first: JsonValue =
        serde_json::from_str(r#"{"consumer":{"name":"Foo"},"interactions":[{"a":1,"b":2}]}"#).unwrap();
    let reordered: JsonValue =
        serde_json::from_str(r#"{"interactions":[{"b":2,"a":1}],"consumer":{"name":"Foo"}}"#).unwrap();

    let r1 = ledger.publish("Foo", "1", "Bar", first);
    let r1_again = ledger.publish("Foo", "1", "Bar", reordered);
    assert_eq!(r1_again.id, r1.id);
    assert_eq!(r1_again.revision_number, 1);
}

#[test]
fn same_content_for_other_provider_is_distinct_content() {
    let ledger = TestLedger::new();
    let to_bar = ledger.publish("Foo", "1", "Bar", json!({"a": 1}));
    let to_baz = ledger.publish("Foo", "1", "Baz", json!({"a": 1}));
    assert_ne!(to_bar.content_id, to_baz.content_id);
    assert_eq!(to_baz.revision_number, 1);
}

#[test]
fn content_is_shared_across_consumer_versions() {
    let ledger = TestLedger::new();
    let v1 = ledger.publish("Foo", "1", "Bar", json!({"a": 1}));
    let v2 = ledger.publish("Foo", "2", "Bar", json!({"a": 1}));
    assert_eq!(v1.content_id, v2.content_id);
    assert_ne!(v1.id, v2.id);
}

#[test]
fn revise_by_stale_id_conflicts() {
    let ledger = TestLedger::new();
    let r1 = ledger.publish("Foo", "1", "Bar", json!({"a": 1}));
    ledger.db.revise(r1.id, "h2", json!({"a": 2})).unwrap();

    let err = ledger.db.revise(r1.id, "h3", json!({"a": 3})).unwrap_err();
    assert!(err.is_conflict());
    assert!(err.is_retryable());

    let revisions = ledger.db.resolver().find_all_revisions("Foo", "1", "Bar");
    let numbers: Vec<u32> = revisions.iter().map(|p| p.revision_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn concurrent_publishers_of_one_pair_serialize() {
    let ledger = TestLedger::new();
    let bar = ledger.component("Bar");
    let foo1 = ledger.version("Foo", "1", &[]);
    let db = Arc::new(ledger.db);

    let handles: Vec<_> = (0..4)
        .map(|thread| {
            let db = Arc::clone(&db);
            std::thread::spawn(move || {
                for i in 0..25 {
                    db.publish(foo1.id, bar.id, json!({ "thread": thread, "i": i }))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let numbers: Vec<u32> = db
        .resolver()
        .find_all_revisions("Foo", "1", "Bar")
        .iter()
        .map(|p| p.revision_number)
        .collect();
    assert_eq!(numbers, (1..=100).collect::<Vec<u32>>());
    assert!(db.latest_pointer_mismatches().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Revisions are 1..=N where N counts content changes
    #[test]
    fn revisions_are_contiguous(bodies in prop::collection::vec(0u8..4, 1..20)) {
        let ledger = TestLedger::new();
        let bar = ledger.component("Bar");
        let foo1 = ledger.version("Foo", "1", &[]);

        let mut changes = 0u32;
        let mut last: Option<u8> = None;
        for body in &bodies {
            let publication = ledger.db.publish(foo1.id, bar.id, json!({ "body": body })).unwrap();
            if last != Some(*body) {
                changes += 1;
            }
            last = Some(*body);
            prop_assert_eq!(publication.revision_number, changes);
        }

        let numbers: Vec<u32> = ledger
            .db
            .resolver()
            .find_all_revisions("Foo", "1", "Bar")
            .iter()
            .map(|p| p.revision_number)
            .collect();
        prop_assert_eq!(numbers, (1..=changes).collect::<Vec<u32>>());
    }
}
