//! Audit-stamping decorator (blocking).
//!
//! Stamps creation and update provenance on every mutation, then delegates to
//! the wrapped store. Reads and deletes pass through after validation. The
//! decorator holds no state besides its inner store and never retries.

use std::sync::Arc;

use auditstore_core::{Entity, OperationContext, StoreResult};
use chrono::Utc;
use tracing::debug;

use crate::store::EntityStore;
use crate::validate;

/// Overwrite both creation and update attribution.
pub(crate) fn stamp_create<E: Entity>(entity: &mut E, ctx: &OperationContext) {
    let now = Utc::now();
    let audit = entity.audit_mut();
    audit.stamp_created(ctx.user_agent(), now);
    audit.stamp_updated(ctx.user_agent(), now);
}

/// Refresh update attribution only.
pub(crate) fn stamp_update<E: Entity>(entity: &mut E, ctx: &OperationContext) {
    entity.audit_mut().stamp_updated(ctx.user_agent(), Utc::now());
}

/// Keep existing creation attribution, refresh update attribution.
pub(crate) fn stamp_upsert<E: Entity>(entity: &mut E, ctx: &OperationContext) {
    let now = Utc::now();
    let audit = entity.audit_mut();
    audit.stamp_created_if_unset(ctx.user_agent(), now);
    audit.stamp_updated(ctx.user_agent(), now);
}

/// Blocking audit-stamping layer.
///
/// # Upsert
///
/// `upsert` stamps metadata and then calls the inner store's **create**, not
/// its upsert. The layer below is expected to give create create-or-replace
/// semantics; this layer does not branch on existence.
pub struct AuditStampingStore<S: ?Sized> {
    inner: Arc<S>,
}

impl<S: ?Sized> AuditStampingStore<S> {
    /// Wrap `inner`.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }
}

impl<S: ?Sized> Clone for AuditStampingStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, S> EntityStore<E> for AuditStampingStore<S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    fn create(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::entity(&entity, ctx)?;
        stamp_create(&mut entity, ctx);
        debug!(
            operation = "create",
            id = %entity.identity(),
            user_agent = ctx.user_agent(),
            "audit stamped"
        );
        self.inner.create(entity, ctx)
    }

    fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        validate::identity(id, ctx)?;
        self.inner.get(id, ctx)
    }

    fn update(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::entity(&entity, ctx)?;
        stamp_update(&mut entity, ctx);
        debug!(
            operation = "update",
            id = %entity.identity(),
            user_agent = ctx.user_agent(),
            "audit stamped"
        );
        self.inner.update(entity, ctx)
    }

    fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        validate::identity(id, ctx)?;
        self.inner.delete(id, ctx)
    }

    fn upsert(&self, mut entity: E, ctx: &OperationContext) -> StoreResult<E> {
        validate::entity(&entity, ctx)?;
        stamp_upsert(&mut entity, ctx);
        debug!(
            operation = "upsert",
            id = %entity.identity(),
            user_agent = ctx.user_agent(),
            "audit stamped"
        );
        self.inner.create(entity, ctx)
    }
}

// ============================================================================
// TESTS
// ============================================================================
