//! Precondition checks shared by the decorators.

use auditstore_core::{
    Entity, Identity, OperationContext, SoftDeletable, StoreResult, ValidationError,
};

pub(crate) fn context(ctx: &OperationContext) -> StoreResult<()> {
    if ctx.user_agent().trim().is_empty() {
        return Err(ValidationError::MissingUserAgent.into());
    }
    Ok(())
}

pub(crate) fn identity<I: Identity>(id: &I, ctx: &OperationContext) -> StoreResult<()> {
    if !id.is_assigned() {
        return Err(ValidationError::UnassignedIdentity.into());
    }
    context(ctx)
}

pub(crate) fn entity<E: Entity>(entity: &E, ctx: &OperationContext) -> StoreResult<()> {
    identity(entity.identity(), ctx)
}

/// Entity checks for every soft-delete write path other than delete.
pub(crate) fn writable<E: SoftDeletable>(
    entity: &E,
    ctx: &OperationContext,
    operation: &'static str,
) -> StoreResult<()> {
    self::entity(entity, ctx)?;
    if entity.is_deleted() {
        return Err(ValidationError::DeletedEntity { operation }.into());
    }
    Ok(())
}
