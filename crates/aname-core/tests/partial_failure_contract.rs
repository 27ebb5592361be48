//! Contract Test: Partial Failure
//!
//! Verifies that the first failure aborts the pass, that nothing is rolled
//! back, and that a later pass converges from whatever state was left.
//!
//! Constraints verified:
//! - A failing create stops further creates and all deletes
//! - Errors surface to the caller unchanged
//! - Resolution and listing failures make no mutations
//! - Re-running after a transient failure converges

mod common;

use aname_core::{CancellationToken, Error, RecordFamily};
use common::*;

#[tokio::test]
async fn failure_on_second_create_aborts_the_rest() {
    let provider = MockDnsProvider::with_records(&["10.0.0.9"]).fail_create(2);
    let engine = engine(
        ScriptedResolver::new(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
        &provider,
    );

    let err = engine.run(&CancellationToken::new()).await.unwrap_err();

    match err {
        Error::Provider {
            provider, status, ..
        } => {
            assert_eq!(provider, "mock");
            assert_eq!(status, Some(409));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(
        provider.calls(),
        vec![
            Call::List(RecordFamily::A),
            Call::List(RecordFamily::Aaaa),
            Call::Create("10.0.0.1".to_string()),
            Call::Create("10.0.0.2".to_string()),
        ],
        "third create and all deletes must not be attempted"
    );
    assert_eq!(provider.contents(), set(&["10.0.0.1", "10.0.0.9"]));
}

#[tokio::test]
async fn retry_after_failure_converges() {
    let provider = MockDnsProvider::with_records(&["10.0.0.9"]).fail_create(2);
    let engine = engine(
        ScriptedResolver::new(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
        &provider,
    );
    let cancel = CancellationToken::new();

    assert!(engine.run(&cancel).await.is_err());

    provider.clear_fault();
    provider.clear_calls();
    let report = engine.run(&cancel).await.unwrap();

    assert_eq!(provider.contents(), set(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]));
    assert_eq!(report.created.len(), 2, "10.0.0.1 survived the failed pass");
    assert_eq!(report.deleted.len(), 1);
}

#[tokio::test]
async fn failing_delete_keeps_created_records() {
    let provider = MockDnsProvider::with_records(&["10.0.0.8", "10.0.0.9"]).fail_delete(1);
    let engine = engine(ScriptedResolver::new(&["10.0.0.1"]), &provider);

    let err = engine.run(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, Error::Provider { status: Some(500), .. }));
    assert_eq!(provider.contents(), set(&["10.0.0.1", "10.0.0.8", "10.0.0.9"]));
    assert_eq!(
        provider
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Delete(_)))
            .count(),
        1,
        "second delete must not be attempted"
    );
}

#[tokio::test]
async fn unclassifiable_address_aborts() {
    let provider = MockDnsProvider::with_records(&["10.0.0.9"]);
    let engine = engine(ScriptedResolver::new(&["10.0.0.1", "not-an-ip"]), &provider);

    let err = engine.run(&CancellationToken::new()).await.unwrap_err();

    match err {
        Error::Classification { address } => assert_eq!(address, "not-an-ip"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(provider.contents(), set(&["10.0.0.1", "10.0.0.9"]));
    assert!(
        !provider.calls().iter().any(|c| matches!(c, Call::Delete(_))),
        "no deletes after a classification failure"
    );
}

#[tokio::test]
async fn resolution_failure_touches_nothing() {
    let provider = MockDnsProvider::with_records(&["10.0.0.9"]);
    let engine = engine(ScriptedResolver::failing(), &provider);

    let err = engine.run(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, Error::Resolution { .. }));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn listing_failure_makes_no_mutations() {
    let provider = MockDnsProvider::with_records(&["10.0.0.9"]).fail_list(RecordFamily::Aaaa);
    let engine = engine(ScriptedResolver::new(&["10.0.0.1"]), &provider);

    let err = engine.run(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }));
    assert_eq!(provider.mutation_count(), 0);
    assert_eq!(provider.contents(), set(&["10.0.0.9"]));
}
