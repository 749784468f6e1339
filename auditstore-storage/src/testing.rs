//! Shared helpers for this crate's unit tests.

use std::sync::Mutex;

use ::async_trait::async_trait;
use auditstore_core::{
    AuditFields, DeletionFields, Entity, OperationContext, SoftDeletable, StoreError, StoreResult,
};

use crate::async_store::AsyncEntityStore;
use crate::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
    pub id: String,
    pub label: String,
    pub audit: AuditFields,
    pub deletion: DeletionFields,
}

impl Record {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: "initial".to_string(),
            audit: AuditFields::default(),
            deletion: DeletionFields::default(),
        }
    }
}

impl Entity for Record {
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

impl SoftDeletable for Record {
    fn deletion(&self) -> &DeletionFields {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut DeletionFields {
        &mut self.deletion
    }
}

/// One call observed by a spy, keyed by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Create(String),
    Get(String),
    Update(String),
    Delete(String),
    Upsert(String),
}

#[derive(Default)]
struct Journal {
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<StoreError>>,
}

impl Journal {
    /// Record `call` and hand back the queued failure, if any.
    fn record(&self, call: Call) -> StoreResult<()> {
        self.calls.lock().expect("journal lock poisoned").push(call);
        match self.failure.lock().expect("journal lock poisoned").take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("journal lock poisoned").clone()
    }

    fn reset(&self) {
        self.calls.lock().expect("journal lock poisoned").clear();
    }

    fn fail_next(&self, err: StoreError) {
        *self.failure.lock().expect("journal lock poisoned") = Some(err);
    }
}

/// Records every call, then forwards it to `inner`.
pub(crate) struct SpyStore<S> {
    inner: S,
    journal: Journal,
}

impl<S> SpyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            journal: Journal::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.calls()
    }

    pub fn reset(&self) {
        self.journal.reset();
    }

    /// Make the next call fail with `err` without reaching `inner`.
    pub fn fail_next(&self, err: StoreError) {
        self.journal.fail_next(err);
    }
}

impl<E, S> EntityStore<E> for SpyStore<S>
where
    E: Entity,
    S: EntityStore<E>,
{
    fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Create(entity.identity().to_string()))?;
        self.inner.create(entity, ctx)
    }

    fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Get(id.to_string()))?;
        self.inner.get(id, ctx)
    }

    fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Update(entity.identity().to_string()))?;
        self.inner.update(entity, ctx)
    }

    fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Delete(id.to_string()))?;
        self.inner.delete(id, ctx)
    }

    fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Upsert(entity.identity().to_string()))?;
        self.inner.upsert(entity, ctx)
    }
}

/// Async counterpart of [`SpyStore`].
pub(crate) struct AsyncSpyStore<S> {
    inner: S,
    journal: Journal,
}

impl<S> AsyncSpyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            journal: Journal::default(),
        }
    }

    #[allow(dead_code)]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.calls()
    }

    #[allow(dead_code)]
    pub fn reset(&self) {
        self.journal.reset();
    }

    pub fn fail_next(&self, err: StoreError) {
        self.journal.fail_next(err);
    }
}

#[async_trait]
impl<E, S> AsyncEntityStore<E> for AsyncSpyStore<S>
where
    E: Entity,
    S: AsyncEntityStore<E>,
{
    async fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Create(entity.identity().to_string()))?;
        self.inner.create(entity, ctx).await
    }

    async fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Get(id.to_string()))?;
        self.inner.get(id, ctx).await
    }

    async fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Update(entity.identity().to_string()))?;
        self.inner.update(entity, ctx).await
    }

    async fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Delete(id.to_string()))?;
        self.inner.delete(id, ctx).await
    }

    async fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.journal.record(Call::Upsert(entity.identity().to_string()))?;
        self.inner.upsert(entity, ctx).await
    }
}
