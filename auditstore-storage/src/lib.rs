//! auditstore Storage - Store Contracts, Decorators and In-Memory Adapter
//!
//! Stores are stacked: an adapter at the bottom, decorators on top, each layer
//! implementing the same [`EntityStore`] (or [`AsyncEntityStore`]) contract.
//!
//! ```ignore
//! let adapter = Arc::new(InMemoryAdapter::<Widget>::new());
//! let audited = Arc::new(AuditStampingStore::new(adapter));
//! let store = SoftDeleteStore::new(audited);
//! store.create(widget, &OperationContext::new("billing-service"))?;
//! ```
//!
//! Placing the soft-delete layer outside the audit layer means tombstoning
//! writes go through audit stamping as ordinary updates.

pub mod async_store;
pub mod audit;
pub mod audit_async;
pub mod memory;
pub mod probe;
pub mod soft_delete;
pub mod soft_delete_async;
pub mod store;

mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use async_store::AsyncEntityStore;
pub use audit::AuditStampingStore;
pub use audit_async::AsyncAuditStampingStore;
pub use memory::{AsyncInMemoryAdapter, CreateMode, InMemoryAdapter, InMemoryConfig};
pub use probe::{Probe, VisibilityState};
pub use soft_delete::SoftDeleteStore;
pub use soft_delete_async::AsyncSoftDeleteStore;
pub use store::EntityStore;
