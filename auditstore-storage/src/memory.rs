//! In-memory reference adapter.
//!
//! A `HashMap` behind an `RwLock`, used as the innermost layer in tests and
//! examples. It performs physical deletes; soft deletion is the decorators'
//! business.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ::async_trait::async_trait;
use auditstore_core::{AdapterError, Entity, OperationContext, StoreError, StoreResult};

use crate::async_store::AsyncEntityStore;
use crate::store::EntityStore;

/// What `create` does when the identity is already occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateMode {
    /// Replace the existing record (create-or-replace).
    #[default]
    Replace,
    /// Fail with `Conflict`.
    Reject,
}

/// Configuration for the in-memory adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryConfig {
    pub create_mode: CreateMode,
    /// Fail async operations with `AdapterError::Cancelled` once the
    /// context's signal has fired.
    pub honor_cancellation: bool,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            create_mode: CreateMode::Replace,
            honor_cancellation: true,
        }
    }
}

impl InMemoryConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the create mode.
    pub fn with_create_mode(mut self, mode: CreateMode) -> Self {
        self.create_mode = mode;
        self
    }

    /// Enable or disable cancellation checks.
    pub fn with_honor_cancellation(mut self, honor: bool) -> Self {
        self.honor_cancellation = honor;
        self
    }
}

type Table<E> = Arc<RwLock<HashMap<<E as Entity>::Id, E>>>;

/// Blocking in-memory adapter.
pub struct InMemoryAdapter<E: Entity> {
    records: Table<E>,
    config: InMemoryConfig,
}

impl<E: Entity> Default for InMemoryAdapter<E> {
    fn default() -> Self {
        Self::with_config(InMemoryConfig::default())
    }
}

impl<E: Entity> InMemoryAdapter<E> {
    /// Create an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty adapter with the given config.
    pub fn with_config(config: InMemoryConfig) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &InMemoryConfig {
        &self.config
    }

    /// Async adapter over the same records.
    pub fn to_async(&self) -> AsyncInMemoryAdapter<E> {
        AsyncInMemoryAdapter {
            sync: InMemoryAdapter {
                records: Arc::clone(&self.records),
                config: self.config.clone(),
            },
        }
    }

    /// Number of physical records, tombstones included.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Clear all stored data.
    pub fn clear(&self) -> StoreResult<()> {
        self.write()?.clear();
        Ok(())
    }

    /// The physical record for `id`, whatever its deletion state.
    pub fn raw_get(&self, id: &E::Id) -> StoreResult<Option<E>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<E::Id, E>>> {
        self.records.read().map_err(|_| poisoned())
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<E::Id, E>>> {
        self.records.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    AdapterError::Backend {
        reason: "storage lock poisoned".to_string(),
    }
    .into()
}

impl<E: Entity> EntityStore<E> for InMemoryAdapter<E> {
    fn create(&self, entity: E, _ctx: &OperationContext) -> StoreResult<E> {
        let mut records = self.write()?;
        let id = entity.identity().clone();
        if self.config.create_mode == CreateMode::Reject && records.contains_key(&id) {
            return Err(StoreError::conflict(&id));
        }
        records.insert(id, entity.clone());
        Ok(entity)
    }

    fn get(&self, id: &E::Id, _ctx: &OperationContext) -> StoreResult<E> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn update(&self, entity: E, _ctx: &OperationContext) -> StoreResult<E> {
        let mut records = self.write()?;
        let slot = records
            .get_mut(entity.identity())
            .ok_or_else(|| StoreError::not_found(entity.identity()))?;
        *slot = entity.clone();
        Ok(entity)
    }

    fn delete(&self, id: &E::Id, _ctx: &OperationContext) -> StoreResult<E> {
        self.write()?
            .remove(id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn upsert(&self, entity: E, _ctx: &OperationContext) -> StoreResult<E> {
        self.write()?.insert(entity.identity().clone(), entity.clone());
        Ok(entity)
    }
}

/// Async in-memory adapter.
///
/// Shares its records with the [`InMemoryAdapter`] it was created from.
pub struct AsyncInMemoryAdapter<E: Entity> {
    sync: InMemoryAdapter<E>,
}

impl<E: Entity> Default for AsyncInMemoryAdapter<E> {
    fn default() -> Self {
        InMemoryAdapter::new().to_async()
    }
}

impl<E: Entity> AsyncInMemoryAdapter<E> {
    /// Create an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty adapter with the given config.
    pub fn with_config(config: InMemoryConfig) -> Self {
        InMemoryAdapter::with_config(config).to_async()
    }

    /// Blocking view over the same records.
    pub fn blocking(&self) -> &InMemoryAdapter<E> {
        &self.sync
    }

    fn check_cancelled(&self, ctx: &OperationContext) -> StoreResult<()> {
        if self.sync.config.honor_cancellation && ctx.is_cancelled() {
            return Err(AdapterError::Cancelled.into());
        }
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> AsyncEntityStore<E> for AsyncInMemoryAdapter<E> {
    async fn create(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.check_cancelled(ctx)?;
        EntityStore::create(&self.sync, entity, ctx)
    }

    async fn get(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.check_cancelled(ctx)?;
        EntityStore::get(&self.sync, id, ctx)
    }

    async fn update(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.check_cancelled(ctx)?;
        EntityStore::update(&self.sync, entity, ctx)
    }

    async fn delete(&self, id: &E::Id, ctx: &OperationContext) -> StoreResult<E> {
        self.check_cancelled(ctx)?;
        EntityStore::delete(&self.sync, id, ctx)
    }

    async fn upsert(&self, entity: E, ctx: &OperationContext) -> StoreResult<E> {
        self.check_cancelled(ctx)?;
        EntityStore::upsert(&self.sync, entity, ctx)
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
