//! Soft-delete decorator (async).
//!
//! Mirrors [`SoftDeleteStore`](crate::SoftDeleteStore) operation for operation.
//! The only difference is that inner calls are awaited; no cancellation check
//! happens at this layer.

use std::sync::Arc;

use ::async_trait::async_trait;
use auditstore_core::{OperationContext, SoftDeletable, StoreError, StoreResult};
use tracing::{debug, trace};

use crate::async_store::AsyncEntityStore;
use crate::probe::Probe;
use crate::soft_delete::{revive, tombstone};
use crate::validate;

/// Async soft-delete layer.
pub struct AsyncSoftDeleteStore<S: ?Sized> {
    inner: Arc<S>,
}

impl<S: ?Sized> AsyncSoftDeleteStore<S> {
    /// Wrap `inner`.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// Look `id` up in the wrapped store and classify the result.
    pub async fn probe<E>(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<Probe<E>>
    where
        E: SoftDeletable,
        S: AsyncEntityStore<E>,
    {
        let probe = Probe::classify(self.inner.get(id, ctx).await)?;
        trace!(id = %id, state = probe.state().as_str(), "probe");
        Ok(probe)
    }
}

impl<S: ?Sized> Clone for AsyncSoftDeleteStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<E, S> AsyncEntityStore<E> for AsyncSoftDeleteStore<S>
where
    E: SoftDeletable,
    S: AsyncEntityStore<E> + ?Sized,
{
    async fn create(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::writable(&entity, ctx, "create")?;

        match self.probe::<E>(entity.identity(), ctx).await? {
            Probe::Active(_) => {
                debug!(operation = "create", id = %entity.identity(), outcome = "conflict");
                Err(StoreError::conflict(entity.identity()))
            }
            Probe::Tombstoned => {
                revive(&mut entity);
                debug!(operation = "create", id = %entity.identity(), outcome = "resurrect");
                self.inner.update(entity, ctx).await
            }
            Probe::Absent(_) => {
                revive(&mut entity);
                debug!(operation = "create", id = %entity.identity(), outcome = "insert");
                self.inner.create(entity, ctx).await
            }
        }
    }

    async fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        validate::identity(id, ctx)?;
        self.probe::<E>(id, ctx).await?.into_active(id)
    }

    async fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::writable(&entity, ctx, "update")?;
        self.probe::<E>(entity.identity(), ctx).await?.into_active(entity.identity())?;
        self.inner.update(entity, ctx).await
    }

    async fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        validate::identity(id, ctx)?;
        let mut existing = self.probe::<E>(id, ctx).await?.into_active(id)?;
        tombstone(&mut existing, ctx);
        debug!(
            operation = "delete",
            id = %id,
            user_agent = ctx.user_agent(),
            outcome = "tombstone"
        );
        self.inner.update(existing, ctx).await
    }

    async fn upsert(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::writable(&entity, ctx, "upsert")?;
        revive(&mut entity);
        self.inner.upsert(entity, ctx).await
    }
}
