//! auditstore Core - Entity Model, Context and Errors
//!
//! Pure data types shared by every store layer. The decorators and adapters
//! live in `auditstore-storage`.

pub mod context;
pub mod entity;
pub mod error;
pub mod identity;
pub mod telemetry;

pub use context::{CancellationSignal, CancellationSource, OperationContext};
pub use entity::{AuditFields, DeletionFields, Entity, SoftDeletable};
pub use error::{AdapterError, ErrorCode, StoreError, StoreResult, ValidationError};
pub use identity::{new_identity, Identity, Timestamp};
pub use telemetry::{init_tracing, TelemetryConfig, TelemetryError};
