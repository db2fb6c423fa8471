//! latest_for / previous / next and the finder queries

use crate::common::*;

/// Foo 1 (prod), Foo 2, Foo 3 (prod, feat) and baz 1 publish to Bar.
fn history() -> TestLedger {
    let ledger = TestLedger::new();
    ledger.version("Foo", "1", &["prod"]);
    ledger.version("Foo", "2", &[]);
    ledger.version("Foo", "3", &["prod", "feat"]);
    ledger.version("baz", "1", &[]);
    ledger.publish("Foo", "1", "Bar", json!({"v": 1}));
    ledger.publish("Foo", "2", "Bar", json!({"v": 2}));
    ledger.publish("Foo", "3", "Bar", json!({"v": 3}));
    ledger.publish("baz", "1", "Bar", json!({"z": 1}));
    ledger
}

#[test]
fn latest_for_picks_one_pact_per_consumer() {
    let ledger = history();
    let latest = ledger.db.resolver().latest_for("Bar", &TagFilter::Any);
    assert_eq!(consumer_names(&latest), vec!["baz", "Foo"]);
    assert_eq!(version_numbers(&latest), vec!["1", "3"]);
}

#[test]
fn latest_for_with_tag_filters() {
    let ledger = history();
    let resolver = ledger.db.resolver();

    let prod = resolver.latest_for("Bar", &TagFilter::named("prod"));
    assert_eq!(version_numbers(&prod), vec!["3"]);

    let untagged = resolver.latest_for("Bar", &TagFilter::Untagged);
    assert_eq!(consumer_names(&untagged), vec!["baz", "Foo"]);
    assert_eq!(version_numbers(&untagged), vec!["1", "2"]);

    assert!(resolver.latest_for("Bar", &TagFilter::named("nope")).is_empty());
    assert!(resolver.latest_for("Nobody", &TagFilter::Any).is_empty());
}

#[test]
fn latest_for_uses_latest_revision() {
    let ledger = history();
    ledger.publish("Foo", "3", "Bar", json!({"v": "3b"}));
    let latest = ledger.db.resolver().latest_for("Bar", &TagFilter::named("feat"));
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].revision_number, 2);
    assert_eq!(*latest[0].content, json!({"v": "3b"}));
}

#[test]
fn previous_and_next_walk_version_order() {
    let ledger = history();
    let resolver = ledger.db.resolver();
    let foo3 = resolver.find_pact("Foo", Some("3"), "Bar", None).unwrap();

    let foo2 = resolver.previous(&foo3, &TagFilter::Any).unwrap();
    assert_eq!(foo2.consumer_version_number(), "2");
    let foo1 = resolver.previous(&foo2, &TagFilter::Any).unwrap();
    assert_eq!(foo1.consumer_version_number(), "1");
    assert!(resolver.previous(&foo1, &TagFilter::Any).is_none());

    assert_eq!(resolver.next(&foo1).unwrap().consumer_version_number(), "2");
    assert_eq!(resolver.next(&foo2).unwrap().consumer_version_number(), "3");
    assert!(resolver.next(&foo3).is_none());
}

#[test]
fn previous_respects_tag_filter() {
    let ledger = history();
    let resolver = ledger.db.resolver();
    let foo3 = resolver.find_pact("Foo", Some("3"), "Bar", None).unwrap();

    let prev_prod = resolver.previous(&foo3, &TagFilter::named("prod")).unwrap();
    assert_eq!(prev_prod.consumer_version_number(), "1");
    let prev_untagged = resolver.previous(&foo3, &TagFilter::Untagged).unwrap();
    assert_eq!(prev_untagged.consumer_version_number(), "2");
    assert!(resolver.previous(&foo3, &TagFilter::named("feat")).is_none());
}

#[test]
fn previous_pacts_per_tag() {
    let ledger = history();
    let resolver = ledger.db.resolver();

    let foo3 = resolver.find_pact("Foo", Some("3"), "Bar", None).unwrap();
    let by_tag = resolver.previous_pacts(&foo3);
    let summary: Vec<(String, Option<String>)> = by_tag
        .iter()
        .map(|(tag, pact)| {
            (
                tag.to_string(),
                pact.as_ref().map(|p| p.consumer_version_number().to_string()),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("feat".to_string(), None),
            ("prod".to_string(), Some("1".to_string())),
        ]
    );

    let foo2 = resolver.find_pact("Foo", Some("2"), "Bar", None).unwrap();
    let by_tag = resolver.previous_pacts(&foo2);
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].0, TagFilter::Untagged);
    assert!(by_tag[0].1.is_none());
}

#[test]
fn finder_queries() {
    let ledger = history();
    ledger.publish("Foo", "3", "Baz", json!({"other": true}));
    let resolver = ledger.db.resolver();

    let latest = resolver.latest_pacts();
    let pairs: Vec<(String, String)> = latest
        .iter()
        .map(|p| (p.consumer_name().to_string(), p.provider_name().to_string()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("baz".to_string(), "Bar".to_string()),
            ("Foo".to_string(), "Bar".to_string()),
            ("Foo".to_string(), "Baz".to_string()),
        ]
    );

    let for_bar = resolver.pacts_for_provider("Bar", &TagFilter::Any);
    assert_eq!(consumer_names(&for_bar), vec!["baz", "Foo", "Foo", "Foo"]);
    assert_eq!(version_numbers(&for_bar), vec!["1", "1", "2", "3"]);
    let prod_for_bar = resolver.pacts_for_provider("Bar", &TagFilter::named("prod"));
    assert_eq!(version_numbers(&prod_for_bar), vec!["1", "3"]);

    let foo3 = resolver.find_by_consumer_version("Foo", "3");
    let providers: Vec<&str> = foo3.iter().map(|p| p.provider_name()).collect();
    assert_eq!(providers, vec!["Bar", "Baz"]);

    let between = resolver.all_pact_versions_between("Foo", "Bar", &TagFilter::Any);
    assert_eq!(version_numbers(&between), vec!["3", "2", "1"]);

    let latest_prod = resolver
        .find_latest_pact("Foo", "Bar", &TagFilter::named("prod"))
        .unwrap();
    assert_eq!(latest_prod.consumer_version_number(), "3");
    let latest_untagged = resolver
        .find_latest_pact("Foo", "Bar", &TagFilter::Untagged)
        .unwrap();
    assert_eq!(latest_untagged.consumer_version_number(), "2");
    assert!(resolver
        .find_latest_pact("Foo", "Nobody", &TagFilter::Any)
        .is_none());

    let any_baz = resolver
        .search_latest_pact(None, Some("Baz"), &TagFilter::Any)
        .unwrap();
    assert_eq!(any_baz.consumer_name(), "Foo");
}

#[test]
fn find_pact_by_sha_picks_most_recent_version() {
    let ledger = TestLedger::new();
    let first = ledger.publish("Foo", "1", "Bar", json!({"same": true}));
    ledger.publish("Foo", "2", "Bar", json!({"other": true}));
    ledger.publish("Foo", "3", "Bar", json!({"same": true}));
    let resolver = ledger.db.resolver();

    let sha = ledger.pact(&first).content_sha;
    let found = resolver.find_pact("Foo", None, "Bar", Some(sha.as_str())).unwrap();
    assert_eq!(found.consumer_version_number(), "3");

    let pinned = resolver.find_pact("Foo", Some("1"), "Bar", Some(sha.as_str())).unwrap();
    assert_eq!(pinned.id, first.id);
    assert!(resolver.find_pact("Foo", None, "Bar", Some("missing")).is_none());
}
