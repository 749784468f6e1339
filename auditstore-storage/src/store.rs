//! Blocking entity store contract.

use std::sync::Arc;

use auditstore_core::{Entity, OperationContext, StoreResult};

/// Blocking CRUD surface shared by adapters and decorators.
///
/// Every layer of a store stack implements this trait, so decorators can wrap
/// an adapter or another decorator interchangeably. Each operation returns the
/// resulting entity or fails; adapters report an unknown identity on
/// get/update/delete as `StoreError::NotFound`.
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Persist a new entity.
    fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E>;

    /// Fetch an entity by identity.
    fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E>;

    /// Replace an existing entity.
    fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E>;

    /// Remove an entity by identity, returning what was removed.
    fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E>;

    /// Create or replace.
    fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E>;
}

impl<E, S> EntityStore<E> for Arc<S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        (**self).create(entity, ctx)
    }

    fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        (**self).get(id, ctx)
    }

    fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        (**self).update(entity, ctx)
    }

    fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        (**self).delete(id, ctx)
    }

    fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        (**self).upsert(entity, ctx)
    }
}
