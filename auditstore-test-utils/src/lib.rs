//! auditstore Test Utilities
//!
//! Shared test infrastructure for the auditstore workspace:
//! - Sample entities (`Widget`, `Document`)
//! - Proptest generators for identities, contexts and entities
//! - Fixtures for store stacks and common records
//! - A recording spy store for asserting inner call sequences
//! - Custom assertions for store results

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use auditstore_core::{
    AdapterError, AuditFields, CancellationSignal, CancellationSource, DeletionFields, Entity,
    Identity, OperationContext, SoftDeletable, StoreError, StoreResult, Timestamp,
    ValidationError,
};
pub use auditstore_storage::{
    AsyncAuditStampingStore, AsyncEntityStore, AsyncInMemoryAdapter, AsyncSoftDeleteStore,
    AuditStampingStore, CreateMode, EntityStore, InMemoryAdapter, InMemoryConfig,
    SoftDeleteStore,
};

// ============================================================================
// SAMPLE ENTITIES
// ============================================================================

/// Audit-only entity keyed by UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Widget {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            quantity,
            audit: AuditFields::default(),
        }
    }
}

impl Entity for Widget {
    type Id = Uuid;

    fn identity(&self) -> &Uuid {
        &self.id
    }

    fn set_identity(&mut self, id: Uuid) {
        self.id = id;
    }

    fn audit(&self) -> &AuditFields {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditFields {
        &mut self.audit
    }
}

/// Soft-deletable entity keyed by a caller-chosen string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(flatten)]
    pub audit: AuditFields,
    #[serde(flatten)]
    pub deletion: DeletionFields,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            audit: AuditFields::default(),
            deletion: DeletionFields::default(),
        }
    }
}

impl Entity for Document {
    type Id = String;

    fn identity(&self) -> &String {
        &self.id
    }

    fn set_identity(&mut self, id: String) {
        self.id = id;
    }

    fn audit(&self) -> &AuditFields {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditFields {
        &mut self.audit
    }
}

impl SoftDeletable for Document {
    fn deletion(&self) -> &DeletionFields {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut DeletionFields {
        &mut self.deletion
    }
}

// ============================================================================
// RECORDING STORE
// ============================================================================

/// One call that reached a [`RecordingStore`], keyed by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create(String),
    Get(String),
    Update(String),
    Delete(String),
    Upsert(String),
}

impl StoreCall {
    pub fn id(&self) -> &str {
        match self {
            StoreCall::Create(id)
            | StoreCall::Get(id)
            | StoreCall::Update(id)
            | StoreCall::Delete(id)
            | StoreCall::Upsert(id) => id,
        }
    }
}

#[derive(Debug, Default)]
struct CallLog {
    calls: Mutex<Vec<StoreCall>>,
    failure: Mutex<Option<StoreError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CallLog {
    fn record(&self, call: StoreCall) -> StoreResult<()> {
        lock(&self.calls).push(call);
        match lock(&self.failure).take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

macro_rules! recording_accessors {
    () => {
        /// The wrapped store.
        pub fn inner(&self) -> &S {
            &self.inner
        }

        /// Calls observed so far, oldest first.
        pub fn calls(&self) -> Vec<StoreCall> {
            lock(&self.log.calls).clone()
        }

        /// Forget all recorded calls.
        pub fn reset(&self) {
            lock(&self.log.calls).clear();
        }

        /// Fail the next call with `err`. The call is still recorded but never
        /// reaches the wrapped store.
        pub fn fail_next(&self, err: StoreError) {
            *lock(&self.log.failure) = Some(err);
        }
    };
}

/// Blocking spy that records every call and forwards it.
#[derive(Debug, Default)]
pub struct RecordingStore<S> {
    inner: S,
    log: CallLog,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            log: CallLog::default(),
        }
    }

    recording_accessors!();
}

impl<E, S> EntityStore<E> for RecordingStore<S>
where
    E: Entity,
    S: EntityStore<E>,
{
    fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Create(entity.identity().to_string()))?;
        self.inner.create(entity, ctx)
    }

    fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Get(id.to_string()))?;
        self.inner.get(id, ctx)
    }

    fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Update(entity.identity().to_string()))?;
        self.inner.update(entity, ctx)
    }

    fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Delete(id.to_string()))?;
        self.inner.delete(id, ctx)
    }

    fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Upsert(entity.identity().to_string()))?;
        self.inner.upsert(entity, ctx)
    }
}

/// Async spy that records every call and forwards it.
#[derive(Debug, Default)]
pub struct AsyncRecordingStore<S> {
    inner: S,
    log: CallLog,
}

impl<S> AsyncRecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            log: CallLog::default(),
        }
    }

    recording_accessors!();
}

#[async_trait]
impl<E, S> AsyncEntityStore<E> for AsyncRecordingStore<S>
where
    E: Entity,
    S: AsyncEntityStore<E>,
{
    async fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Create(entity.identity().to_string()))?;
        self.inner.create(entity, ctx).await
    }

    async fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Get(id.to_string()))?;
        self.inner.get(id, ctx).await
    }

    async fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Update(entity.identity().to_string()))?;
        self.inner.update(entity, ctx).await
    }

    async fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Delete(id.to_string()))?;
        self.inner.delete(id, ctx).await
    }

    async fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.log.record(StoreCall::Upsert(entity.identity().to_string()))?;
        self.inner.upsert(entity, ctx).await
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for auditstore types.

    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    /// Generate a random UUID, nil included.
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a UUID that counts as an assigned identity.
    pub fn arb_assigned_uuid() -> impl Strategy<Value = Uuid> {
        arb_uuid().prop_filter("nil uuid is unassigned", |id| !id.is_nil())
    }

    /// Generate a non-blank string identity.
    pub fn arb_string_id() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9_-]{0,23}"
    }

    /// Generate a plausible caller name.
    pub fn arb_user_agent() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,15}"
    }

    /// Generate a user agent made only of whitespace.
    pub fn arb_blank_user_agent() -> impl Strategy<Value = String> {
        "[ \t]{0,4}"
    }

    /// Generate a timestamp between 2020 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    /// Generate audit fields with each field independently set or unset.
    pub fn arb_audit_fields() -> impl Strategy<Value = AuditFields> {
        (
            proptest::option::of(arb_user_agent()),
            proptest::option::of(arb_timestamp()),
            proptest::option::of(arb_user_agent()),
            proptest::option::of(arb_timestamp()),
        )
            .prop_map(
                |(created_by, created_date_time, updated_by, updated_date_time)| AuditFields {
                    created_by,
                    created_date_time,
                    updated_by,
                    updated_date_time,
                },
            )
    }

    /// Generate deletion fields that do not mark the record as deleted.
    pub fn arb_live_deletion_fields() -> impl Strategy<Value = DeletionFields> {
        prop_oneof![Just(None), Just(Some(false))].prop_map(|is_deleted| DeletionFields {
            deleted_by: None,
            deleted_date_time: None,
            is_deleted,
        })
    }

    /// Generate a widget with arbitrary caller-supplied audit fields.
    pub fn arb_widget() -> impl Strategy<Value = Widget> {
        (arb_assigned_uuid(), "[a-z ]{1,20}", any::<u32>(), arb_audit_fields()).prop_map(
            |(id, name, quantity, audit)| Widget {
                id,
                name,
                quantity,
                audit,
            },
        )
    }

    /// Generate a document that is acceptable input to every write path.
    pub fn arb_document() -> impl Strategy<Value = Document> {
        (
            arb_string_id(),
            "[A-Za-z ]{1,30}",
            ".{0,64}",
            arb_audit_fields(),
            arb_live_deletion_fields(),
        )
            .prop_map(|(id, title, body, audit, deletion)| Document {
                id,
                title,
                body,
                audit,
                deletion,
            })
    }

    /// Generate a document flagged as deleted.
    pub fn arb_deleted_document() -> impl Strategy<Value = Document> {
        (arb_document(), arb_user_agent(), arb_timestamp()).prop_map(|(mut doc, by, at)| {
            doc.deletion.mark_deleted(&by, at);
            doc
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common testing scenarios.

    use super::*;
    use chrono::Utc;

    /// Default caller for fixtures.
    pub const TEST_AGENT: &str = "test-agent";

    /// Blocking full stack: soft delete over audit over the adapter.
    pub type SyncStack<E> = SoftDeleteStore<AuditStampingStore<InMemoryAdapter<E>>>;

    /// Async full stack: soft delete over audit over the adapter.
    pub type AsyncStack<E> =
        AsyncSoftDeleteStore<AsyncAuditStampingStore<AsyncInMemoryAdapter<E>>>;

    pub fn context() -> OperationContext {
        OperationContext::new(TEST_AGENT)
    }

    pub fn context_for(user_agent: &str) -> OperationContext {
        OperationContext::new(user_agent)
    }

    /// A context whose signal has already fired.
    pub fn cancelled_context() -> OperationContext {
        let (source, signal) = CancellationSource::new();
        source.cancel();
        OperationContext::new(TEST_AGENT).with_cancellation(signal)
    }

    pub fn widget() -> Widget {
        Widget::new("sprocket", 3)
    }

    pub fn document(id: &str) -> Document {
        let mut doc = Document::new(id, "Quarterly report");
        doc.body = "Revenue is up.".to_string();
        doc
    }

    /// A document as it would be stored after a soft delete.
    pub fn tombstoned_document(id: &str) -> Document {
        let mut doc = document(id);
        doc.deletion.mark_deleted(TEST_AGENT, Utc::now());
        doc
    }

    /// Build the blocking full stack, returning the adapter for inspection.
    pub fn sync_stack<E: SoftDeletable>() -> (Arc<InMemoryAdapter<E>>, SyncStack<E>) {
        sync_stack_with(InMemoryConfig::default())
    }

    pub fn sync_stack_with<E: SoftDeletable>(
        config: InMemoryConfig,
    ) -> (Arc<InMemoryAdapter<E>>, SyncStack<E>) {
        let adapter = Arc::new(InMemoryAdapter::with_config(config));
        let audited = Arc::new(AuditStampingStore::new(Arc::clone(&adapter)));
        (adapter, SoftDeleteStore::new(audited))
    }

    /// Build the async full stack, returning the adapter for inspection.
    pub fn async_stack<E: SoftDeletable>() -> (Arc<AsyncInMemoryAdapter<E>>, AsyncStack<E>) {
        let adapter = Arc::new(AsyncInMemoryAdapter::new());
        let audited = Arc::new(AsyncAuditStampingStore::new(Arc::clone(&adapter)));
        (adapter, AsyncSoftDeleteStore::new(audited))
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for store results and audit metadata.

    use super::*;

    /// Assert that a result is `NotFound` for `id`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &StoreResult<T>, id: &str) {
        match result {
            Err(StoreError::NotFound { id: got }) => {
                assert_eq!(got, id, "Wrong identity in NotFound error");
            }
            other => panic!("Expected NotFound for {id}, got: {other:?}"),
        }
    }

    /// Assert that a result is `Conflict` for `id`.
    #[track_caller]
    pub fn assert_conflict<T: std::fmt::Debug>(result: &StoreResult<T>, id: &str) {
        match result {
            Err(StoreError::Conflict { id: got }) => {
                assert_eq!(got, id, "Wrong identity in Conflict error");
            }
            other => panic!("Expected Conflict for {id}, got: {other:?}"),
        }
    }

    /// Assert that a result is the given validation failure.
    #[track_caller]
    pub fn assert_invalid_input<T: std::fmt::Debug>(
        result: &StoreResult<T>,
        expected: ValidationError,
    ) {
        match result {
            Err(StoreError::InvalidInput(got)) => assert_eq!(*got, expected),
            other => panic!("Expected InvalidInput({expected:?}), got: {other:?}"),
        }
    }

    /// Assert that a stamp is present and falls in `[before, after]`.
    #[track_caller]
    pub fn assert_stamped_within(stamp: Option<Timestamp>, before: Timestamp, after: Timestamp) {
        match stamp {
            Some(at) => assert!(
                at >= before && at <= after,
                "Stamp {at} outside [{before}, {after}]"
            ),
            None => panic!("Expected a stamp in [{before}, {after}], got None"),
        }
    }

    /// Assert creation attribution.
    #[track_caller]
    pub fn assert_created_by(audit: &AuditFields, user_agent: &str) {
        assert_eq!(audit.created_by.as_deref(), Some(user_agent), "createdBy");
        assert!(audit.created_date_time.is_some(), "createdDateTime unset");
    }

    /// Assert update attribution.
    #[track_caller]
    pub fn assert_updated_by(audit: &AuditFields, user_agent: &str) {
        assert_eq!(audit.updated_by.as_deref(), Some(user_agent), "updatedBy");
        assert!(audit.updated_date_time.is_some(), "updatedDateTime unset");
    }

    /// Assert a record is tombstoned with attribution.
    #[track_caller]
    pub fn assert_tombstoned<E: SoftDeletable>(entity: &E, user_agent: &str) {
        let deletion = entity.deletion();
        assert_eq!(deletion.is_deleted, Some(true), "isDeleted");
        assert_eq!(deletion.deleted_by.as_deref(), Some(user_agent), "deletedBy");
        assert!(deletion.deleted_date_time.is_some(), "deletedDateTime unset");
    }

    /// Assert a record is active with no deletion attribution.
    #[track_caller]
    pub fn assert_revived<E: SoftDeletable>(entity: &E) {
        let deletion = entity.deletion();
        assert_eq!(deletion.is_deleted, Some(false), "isDeleted");
        assert!(deletion.deleted_by.is_none(), "deletedBy still set");
        assert!(deletion.deleted_date_time.is_none(), "deletedDateTime still set");
    }
}

// ============================================================================
// TESTS
// ============================================================================
