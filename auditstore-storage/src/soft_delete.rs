//! Soft-delete decorator (blocking).
//!
//! Turns physical delete into a logical tombstone and hides tombstoned records
//! from get, update and delete. Per identity the layer tracks three visibility
//! states:
//!
//! | From       | Operation          | To         | Inner call |
//! |------------|--------------------|------------|------------|
//! | Absent     | create             | Active     | create     |
//! | Active     | create             | (Conflict) | none       |
//! | Tombstoned | create             | Active     | update     |
//! | Active     | update             | Active     | update     |
//! | Active     | delete             | Tombstoned | update     |
//! | Absent or Tombstoned | get, update, delete | (NotFound) | none |
//! | any        | upsert             | Active     | upsert     |
//!
//! Upsert skips the probe entirely. The probe and the write that follows it
//! are two separate inner calls; concurrent callers racing on one identity get
//! whatever the wrapped store's own guarantees give them.

use std::sync::Arc;

use auditstore_core::{OperationContext, SoftDeletable, StoreError, StoreResult};
use chrono::Utc;
use tracing::{debug, trace};

use crate::probe::Probe;
use crate::store::EntityStore;
use crate::validate;

/// Reset deletion metadata before a write that makes the record active.
pub(crate) fn revive<E: SoftDeletable>(entity: &mut E) {
    entity.deletion_mut().clear();
}

/// Tombstone a fetched record on behalf of the caller.
pub(crate) fn tombstone<E: SoftDeletable>(entity: &mut E, ctx: &OperationContext) {
    entity.deletion_mut().mark_deleted(ctx.user_agent(), Utc::now());
}

/// Blocking soft-delete layer.
pub struct SoftDeleteStore<S: ?Sized> {
    inner: Arc<S>,
}

impl<S: ?Sized> SoftDeleteStore<S> {
    /// Wrap `inner`.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// Look `id` up in the wrapped store and classify the result.
    pub fn probe<E>(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<Probe<E>>
    where
        E: SoftDeletable,
        S: EntityStore<E>,
    {
        let probe = Probe::classify(self.inner.get(id, ctx))?;
        trace!(id = %id, state = probe.state().as_str(), "probe");
        Ok(probe)
    }
}

impl<S: ?Sized> Clone for SoftDeleteStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, S> EntityStore<E> for SoftDeleteStore<S>
where
    E: SoftDeletable,
    S: EntityStore<E> + ?Sized,
{
    fn create(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::writable(&entity, ctx, "create")?;

        match self.probe::<E>(entity.identity(), ctx)? {
            Probe::Active(_) => {
                debug!(operation = "create", id = %entity.identity(), outcome = "conflict");
                Err(StoreError::conflict(entity.identity()))
            }
            Probe::Tombstoned => {
                revive(&mut entity);
                debug!(operation = "create", id = %entity.identity(), outcome = "resurrect");
                self.inner.update(entity, ctx)
            }
            Probe::Absent(_) => {
                revive(&mut entity);
                debug!(operation = "create", id = %entity.identity(), outcome = "insert");
                self.inner.create(entity, ctx)
            }
        }
    }

    fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        validate::identity(id, ctx)?;
        self.probe::<E>(id, ctx)?.into_active(id)
    }

    fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::writable(&entity, ctx, "update")?;
        self.probe::<E>(entity.identity(), ctx)?.into_active(entity.identity())?;
        self.inner.update(entity, ctx)
    }

    fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        validate::identity(id, ctx)?;
        let mut existing = self.probe::<E>(id, ctx)?.into_active(id)?;
        tombstone(&mut existing, ctx);
        debug!(
            operation = "delete",
            id = %id,
            user_agent = ctx.user_agent(),
            outcome = "tombstone"
        );
        self.inner.update(existing, ctx)
    }

    fn upsert(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::writable(&entity, ctx, "upsert")?;
        revive(&mut entity);
        self.inner.upsert(entity, ctx)
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
