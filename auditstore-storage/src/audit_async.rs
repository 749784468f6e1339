//! Audit-stamping decorator (async).
//!
//! Same stamping rules as [`AuditStampingStore`](crate::AuditStampingStore);
//! every inner call is awaited in the same order the blocking variant makes it.

use std::sync::Arc;

use ::async_trait::async_trait;
use auditstore_core::{Entity, OperationContext, StoreResult};
use tracing::debug;

use crate::async_store::AsyncEntityStore;
use crate::audit::{stamp_create, stamp_update, stamp_upsert};
use crate::validate;

/// Async audit-stamping layer.
///
/// `upsert` delegates to the inner store's `create`, exactly like the
/// blocking variant.
pub struct AsyncAuditStampingStore<S: ?Sized> {
    inner: Arc<S>,
}

impl<S: ?Sized> AsyncAuditStampingStore<S> {
    /// Wrap `inner`.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }
}

impl<S: ?Sized> Clone for AsyncAuditStampingStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<E, S> AsyncEntityStore<E> for AsyncAuditStampingStore<S>
where
    E: Entity,
    S: AsyncEntityStore<E> + ?Sized,
{
    async fn create(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::entity(&entity, ctx)?;
        stamp_create(&mut entity, ctx);
        debug!(
            operation = "create",
            id = %entity.identity(),
            user_agent = ctx.user_agent(),
            "audit stamped"
        );
        self.inner.create(entity, ctx).await
    }

    async fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        validate::identity(id, ctx)?;
        self.inner.get(id, ctx).await
    }

    async fn update(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::entity(&entity, ctx)?;
        stamp_update(&mut entity, ctx);
        debug!(
            operation = "update",
            id = %entity.identity(),
            user_agent = ctx.user_agent(),
            "audit stamped"
        );
        self.inner.update(entity, ctx).await
    }

    async fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        validate::identity(id, ctx)?;
        self.inner.delete(id, ctx).await
    }

    async fn upsert(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::entity(&entity, ctx)?;
        stamp_upsert(&mut entity, ctx);
        debug!(
            operation = "upsert",
            id = %entity.identity(),
            user_agent = ctx.user_agent(),
            "audit stamped"
        );
        self.inner.create(entity, ctx).await
    }
}
