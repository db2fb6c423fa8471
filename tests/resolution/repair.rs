//! Latest pointers stay consistent with publications

use crate::common::*;
use std::sync::Arc;

#[test]
fn pointers_consistent_after_mixed_workload() {
    let ledger = TestLedger::new();
    for consumer in ["Foo", "Baz"] {
        for n in 1..=5 {
            let number = n.to_string();
            ledger.publish(consumer, &number, "Bar", json!({ "n": n }));
            ledger.publish(consumer, &number, "Bar", json!({ "n": n, "rev": 2 }));
        }
    }
    ledger.db.delete("Foo", "Bar", "3").unwrap();
    ledger.db.delete_between("Baz", "Bar", None).unwrap();

    assert!(ledger.db.latest_pointer_mismatches().is_empty());
    assert_eq!(ledger.db.repair_latest_pointers(), 0);
    let latest = ledger.db.resolver().latest_for("Bar", &TagFilter::Any);
    assert_eq!(version_numbers(&latest), vec!["5"]);
    assert_eq!(latest[0].revision_number, 2);
}

#[test]
fn reopening_over_a_store_keeps_resolution() {
    let ledger = TestLedger::new();
    ledger.publish("Foo", "1", "Bar", json!({"v": 1}));
    ledger.publish("Foo", "2", "Bar", json!({"v": 2}));

    let reopened = PactDatabase::builder()
        .store(Arc::clone(ledger.db.store()))
        .build();
    let latest = reopened.resolver().latest_for("Bar", &TagFilter::Any);
    assert_eq!(version_numbers(&latest), vec!["2"]);
}

#[test]
fn readers_never_see_a_dangling_pointer() {
    let ledger = TestLedger::new();
    let bar = ledger.component("Bar");
    let foo1 = ledger.version("Foo", "1", &[]);
    let db = Arc::new(ledger.db);

    let writer = {
        let db = Arc::clone(&db);
        std::thread::spawn(move || {
            for i in 0..200 {
                db.publish(foo1.id, bar.id, json!({ "i": i })).unwrap();
            }
        })
    };
    for _ in 0..200 {
        let latest = db.resolver().latest_for("Bar", &TagFilter::Any);
        assert!(latest.len() <= 1);
        if let Some(pact) = latest.first() {
            let revisions = db.resolver().find_all_revisions("Foo", "1", "Bar");
            assert!(revisions.len() as u32 >= pact.revision_number);
        }
    }
    writer.join().unwrap();
    assert!(db.latest_pointer_mismatches().is_empty());
}
