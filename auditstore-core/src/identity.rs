//! Identity types for auditstore entities

use chrono::{DateTime, Utc};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Opaque identity value carried by every entity.
///
/// Stores never interpret an identity beyond equality, hashing and display.
/// `is_assigned` is the one structural check: an identity that has not been
/// assigned yet must never reach a store operation.
pub trait Identity: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {
    /// Whether this value identifies a concrete record.
    fn is_assigned(&self) -> bool;
}

impl Identity for Uuid {
    fn is_assigned(&self) -> bool {
        !self.is_nil()
    }
}

impl Identity for String {
    fn is_assigned(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Identity for u64 {
    fn is_assigned(&self) -> bool {
        true
    }
}

impl Identity for i64 {
    fn is_assigned(&self) -> bool {
        true
    }
}

/// Generate a new UUIDv7 identity (timestamp-sortable).
pub fn new_identity() -> Uuid {
    Uuid::now_v7()
}
