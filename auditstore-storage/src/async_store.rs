//! Async entity store contract.
//!
//! This trait is the suspendable counterpart of [`EntityStore`](crate::EntityStore).
//! Each operation may yield while awaiting the layer below it; the context,
//! including its cancellation signal, is threaded through unchanged so the
//! innermost adapter can decide whether to honor cancellation.

use ::async_trait::async_trait;
use std::sync::Arc;

use auditstore_core::{Entity, OperationContext, StoreResult};

/// Async CRUD surface shared by adapters and decorators.
#[async_trait]
pub trait AsyncEntityStore<E: Entity>: Send + Sync {
    /// Persist a new entity.
    async fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E>;

    /// Fetch an entity by identity.
    async fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E>;

    /// Replace an existing entity.
    async fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E>;

    /// Remove an entity by identity, returning what was removed.
    async fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E>;

    /// Create or replace.
    async fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E>;
}

#[async_trait]
impl<E, S> AsyncEntityStore<E> for Arc<S>
where
    E: Entity,
    S: AsyncEntityStore<E> + ?Sized,
{
    async fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        (**self).create(entity, ctx).await
    }

    async fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        (**self).get(id, ctx).await
    }

    async fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        (**self).update(entity, ctx).await
    }

    async fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        (**self).delete(id, ctx).await
    }

    async fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        (**self).upsert(entity, ctx).await
    }
}
