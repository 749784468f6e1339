//! Async stack: soft delete over audit stamping over the in-memory adapter.

use std::sync::Arc;
use std::time::Duration;

use auditstore_core::{AdapterError, CancellationSource, OperationContext, StoreError};
use auditstore_storage::{
    AsyncAuditStampingStore, AsyncEntityStore, AsyncInMemoryAdapter, AsyncSoftDeleteStore,
};
use auditstore_test_utils::assertions::*;
use auditstore_test_utils::fixtures;
use auditstore_test_utils::{AsyncRecordingStore, Document, StoreCall};

fn id(value: &str) -> String {
    value.to_string()
}

#[tokio::test]
async fn scenario_delete_then_recreate_same_identity() {
    let (adapter, store) = fixtures::async_stack::<Document>();
    let ctx = fixtures::context();

    store.create(fixtures::document("E1"), &ctx).await.unwrap();
    let deleted = store
        .delete(&id("E1"), &fixtures::context_for("svc-cleanup"))
        .await
        .unwrap();
    assert_tombstoned(&deleted, "svc-cleanup");
    assert_not_found(&store.get(&id("E1"), &ctx).await, "E1");

    let recreated = store.create(fixtures::document("E1"), &ctx).await.unwrap();
    assert_revived(&recreated);
    assert_revived(&store.get(&id("E1"), &ctx).await.unwrap());
    assert_eq!(adapter.blocking().len().unwrap(), 1);
}

#[tokio::test]
async fn scenario_conflict_then_update_on_active_identity() {
    let (_, store) = fixtures::async_stack::<Document>();
    let created = store
        .create(fixtures::document("E2"), &fixtures::context_for("svc-a"))
        .await
        .unwrap();

    assert_conflict(
        &store.create(fixtures::document("E2"), &fixtures::context()).await,
        "E2",
    );

    let updated = store
        .update(created.clone(), &fixtures::context_for("svc-b"))
        .await
        .unwrap();
    assert_eq!(updated.audit.created_by, created.audit.created_by);
    assert_eq!(updated.audit.created_date_time, created.audit.created_date_time);
    assert_updated_by(&updated.audit, "svc-b");
}

#[tokio::test]
async fn call_sequence_matches_blocking_stack() {
    let spy = Arc::new(AsyncRecordingStore::new(AsyncInMemoryAdapter::<Document>::new()));
    let store = AsyncSoftDeleteStore::new(Arc::new(AsyncAuditStampingStore::new(Arc::clone(&spy))));
    let ctx = fixtures::context();

    store.create(fixtures::document("D1"), &ctx).await.unwrap();
    store.delete(&id("D1"), &ctx).await.unwrap();
    store.create(fixtures::document("D1"), &ctx).await.unwrap();
    store.upsert(fixtures::document("D1"), &ctx).await.unwrap();

    assert_eq!(
        spy.calls(),
        vec![
            StoreCall::Get(id("D1")),
            StoreCall::Create(id("D1")),
            StoreCall::Get(id("D1")),
            StoreCall::Update(id("D1")),
            StoreCall::Get(id("D1")),
            StoreCall::Update(id("D1")),
            StoreCall::Create(id("D1")),
        ]
    );
}

#[tokio::test]
async fn cancellation_is_honored_only_by_the_adapter() {
    let spy = Arc::new(AsyncRecordingStore::new(AsyncInMemoryAdapter::<Document>::new()));
    let store = AsyncSoftDeleteStore::new(Arc::new(AsyncAuditStampingStore::new(Arc::clone(&spy))));

    let err = store
        .create(fixtures::document("D1"), &fixtures::cancelled_context())
        .await
        .unwrap_err();

    // The probe reached the adapter, which refused; nothing was reinterpreted.
    assert_eq!(err, StoreError::Adapter(AdapterError::Cancelled));
    assert_eq!(spy.calls(), vec![StoreCall::Get(id("D1"))]);
    assert!(spy.inner().blocking().is_empty().unwrap());
}

#[tokio::test]
async fn cancel_from_another_task() {
    let (_, store) = fixtures::async_stack::<Document>();
    let (source, signal) = CancellationSource::new();
    let ctx = OperationContext::new("svc-a").with_cancellation(signal.clone());

    store.create(fixtures::document("D1"), &ctx).await.unwrap();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        source.cancel();
    });
    tokio::time::timeout(Duration::from_secs(1), signal.cancelled())
        .await
        .expect("signal should fire");
    canceller.await.unwrap();

    let err = store.get(&id("D1"), &ctx).await.unwrap_err();
    assert_eq!(err, StoreError::Adapter(AdapterError::Cancelled));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_distinct_identities() {
    let (adapter, store) = fixtures::async_stack::<Document>();
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for n in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let ctx = fixtures::context();
            let key = format!("D{n}");
            store.create(fixtures::document(&key), &ctx).await?;
            store.delete(&key, &ctx).await?;
            store.create(fixtures::document(&key), &ctx).await
        }));
    }
    for handle in handles {
        assert_revived(&handle.await.unwrap().unwrap());
    }
    assert_eq!(adapter.blocking().len().unwrap(), 16);
}
