//! Contract Test: Per-Domain Reconciliation
//!
//! Constraints verified:
//! - A record already holding the current IP gets zero mutation calls
//! - A domain without a record gets zero mutation calls (records are never created)
//! - A non-editable record gets zero mutation calls, even with a stale value
//! - A stale editable record gets exactly one remove followed by one add
//! - The replacement keeps the original record type
//!
//! If this test fails, the engine issues redundant or unsafe provider mutations.

mod common;

use common::*;
use ddns_core::config::{RecordConfig, RecordType};
use ddns_core::{DdnsEngine, DomainOutcome, NewRecord};

fn engine(ip: &str, store: &MockRecordStore, domains: &[&str]) -> DdnsEngine {
    DdnsEngine::new(
        Box::new(FixedIpSource::parse(ip)),
        Box::new(store.clone()),
        minimal_config(domains),
    )
    .expect("engine construction succeeds")
}

#[tokio::test]
async fn up_to_date_record_is_not_touched() {
    let store = MockRecordStore::new(vec![record("a.example.com", "A", "1.2.3.4", "1")]);
    let report = engine("1.2.3.4", &store, &["a.example.com"])
        .run()
        .await
        .unwrap();

    assert!(store.mutations().is_empty(), "got {:?}", store.mutations());
    assert!(matches!(report.outcomes[0], DomainOutcome::UpToDate { .. }));
}

#[tokio::test]
async fn missing_record_is_never_created() {
    let store = MockRecordStore::new(vec![record("other.example.com", "A", "9.9.9.9", "1")]);
    let report = engine("1.2.3.4", &store, &["a.example.com"])
        .run()
        .await
        .unwrap();

    assert!(store.mutations().is_empty());
    assert_eq!(
        report.outcomes[0],
        DomainOutcome::NotFound {
            domain: "a.example.com".to_string(),
            record_type: "A".to_string(),
        }
    );
}

#[tokio::test]
async fn record_of_other_type_does_not_match() {
    let store = MockRecordStore::new(vec![record(
        "a.example.com",
        "CNAME",
        "target.example.net",
        "1",
    )]);
    let report = engine("1.2.3.4", &store, &["a.example.com"])
        .run()
        .await
        .unwrap();

    assert!(store.mutations().is_empty());
    assert!(matches!(report.outcomes[0], DomainOutcome::NotFound { .. }));
}

#[tokio::test]
async fn non_editable_record_is_not_touched() {
    let store = MockRecordStore::new(vec![record("a.example.com", "A", "9.9.9.9", "0")]);
    let report = engine("1.2.3.4", &store, &["a.example.com"])
        .run()
        .await
        .unwrap();

    assert!(store.mutations().is_empty());
    assert!(matches!(report.outcomes[0], DomainOutcome::NotEditable { .. }));
}

#[tokio::test]
async fn stale_record_is_removed_then_added() {
    let old = record("a.example.com", "A", "9.9.9.9", "1");
    let store = MockRecordStore::new(vec![old.clone()]);
    let report = engine("1.2.3.4", &store, &["a.example.com"])
        .run()
        .await
        .unwrap();

    assert_eq!(
        store.mutations(),
        vec![
            StoreCall::Remove(old),
            StoreCall::Add(NewRecord::new("a.example.com", "1.2.3.4").with_type("A")),
        ]
    );
    assert_eq!(
        report.outcomes[0],
        DomainOutcome::Updated {
            domain: "a.example.com".to_string(),
            record_type: "A".to_string(),
            previous: "9.9.9.9".to_string(),
            current: "1.2.3.4".parse().unwrap(),
        }
    );
}

#[tokio::test]
async fn aaaa_record_stays_aaaa() {
    let old = record("v6.example.com", "AAAA", "2001:db8::1", "1");
    let store = MockRecordStore::new(vec![old.clone()]);

    let mut config = minimal_config(&[]);
    config.records = vec![RecordConfig::new("v6.example.com").with_record_type(RecordType::Aaaa)];

    let engine = DdnsEngine::new(
        Box::new(FixedIpSource::parse("2001:db8::42")),
        Box::new(store.clone()),
        config,
    )
    .unwrap();
    engine.run().await.unwrap();

    let mutations = store.mutations();
    assert_eq!(mutations.len(), 2);
    assert_eq!(mutations[0], StoreCall::Remove(old));
    match &mutations[1] {
        StoreCall::Add(added) => {
            assert_eq!(added.record_type, "AAAA");
            assert_eq!(added.value, "2001:db8::42");
        }
        other => panic!("expected add, got {:?}", other),
    }
}

#[tokio::test]
async fn auto_type_follows_ip_family() {
    let store = MockRecordStore::new(vec![
        record("dual.example.com", "A", "9.9.9.9", "1"),
        record("dual.example.com", "AAAA", "2001:db8::1", "1"),
    ]);

    let mut config = minimal_config(&[]);
    config.records = vec![RecordConfig::new("dual.example.com").with_record_type(RecordType::Auto)];

    let engine = DdnsEngine::new(
        Box::new(FixedIpSource::parse("2001:db8::1")),
        Box::new(store.clone()),
        config,
    )
    .unwrap();
    let report = engine.run().await.unwrap();

    assert!(store.mutations().is_empty());
    assert!(matches!(
        &report.outcomes[0],
        DomainOutcome::UpToDate { record_type, .. } if record_type == "AAAA"
    ));
}

#[tokio::test]
async fn equivalent_v6_spelling_counts_as_up_to_date() {
    let store = MockRecordStore::new(vec![record(
        "v6.example.com",
        "AAAA",
        "2001:0db8:0000:0000:0000:0000:0000:0001",
        "1",
    )]);

    let mut config = minimal_config(&[]);
    config.records = vec![RecordConfig::new("v6.example.com").with_record_type(RecordType::Aaaa)];

    let engine = DdnsEngine::new(
        Box::new(FixedIpSource::parse("2001:db8::1")),
        Box::new(store.clone()),
        config,
    )
    .unwrap();
    engine.run().await.unwrap();

    assert!(store.mutations().is_empty());
}

#[tokio::test]
async fn configured_comment_is_attached() {
    let store = MockRecordStore::new(vec![record("a.example.com", "A", "9.9.9.9", "1")]);

    let mut config = minimal_config(&["a.example.com"]);
    config.engine.comment = "home router".to_string();

    let engine = DdnsEngine::new(
        Box::new(FixedIpSource::parse("1.2.3.4")),
        Box::new(store.clone()),
        config,
    )
    .unwrap();
    engine.run().await.unwrap();

    match store.mutations().last() {
        Some(StoreCall::Add(added)) => assert_eq!(added.comment, "home router"),
        other => panic!("expected add, got {:?}", other),
    }
}

#[tokio::test]
async fn mixed_domains_scenario() {
    let store = MockRecordStore::new(vec![record("a.example.com", "A", "9.9.9.9", "1")]);
    let report = engine("1.2.3.4", &store, &["a.example.com", "b.example.com"])
        .run()
        .await
        .unwrap();

    assert_eq!(store.mutations_for("a.example.com").len(), 2);
    assert!(store.mutations_for("b.example.com").is_empty());

    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(report.outcomes[0], DomainOutcome::Updated { .. }));
    assert!(matches!(report.outcomes[1], DomainOutcome::NotFound { .. }));
    assert_ne!(report.outcomes[0].to_string(), report.outcomes[1].to_string());
    assert!(!report.has_failures());
}

#[tokio::test]
async fn records_are_listed_once_per_run() {
    let store = MockRecordStore::new(vec![
        record("a.example.com", "A", "9.9.9.9", "1"),
        record("b.example.com", "A", "9.9.9.9", "1"),
    ]);
    engine("1.2.3.4", &store, &["a.example.com", "b.example.com"])
        .run()
        .await
        .unwrap();

    let lists = store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::List))
        .count();
    assert_eq!(lists, 1);
    assert_eq!(store.calls()[0], StoreCall::List);
}

#[tokio::test]
async fn explicit_targets_override_configured_records() {
    let store = MockRecordStore::new(vec![record("b.example.com", "A", "9.9.9.9", "1")]);
    let engine = engine("1.2.3.4", &store, &["a.example.com"]);

    let report = engine
        .reconcile(&[RecordConfig::new("b.example.com")])
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].domain(), "b.example.com");
    assert_eq!(store.mutations_for("b.example.com").len(), 2);
}
