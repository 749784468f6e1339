//! Tombstone-aware existence probe.
//!
//! The soft-delete layers look an identity up in the store they wrap before
//! create, update and delete. The lookup is classified into one of three
//! visibility states instead of being signalled through errors.

use auditstore_core::{Identity, SoftDeletable, StoreError, StoreResult};

/// Logical visibility of an identity under soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityState {
    /// No physical record.
    Absent,
    /// Record present and not deleted.
    Active,
    /// Record present with `isDeleted == true`.
    Tombstoned,
}

/// Outcome of a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<E> {
    Active(E),
    Tombstoned,
    /// Carries the wrapped store's `NotFound` as it was raised.
    Absent(StoreError),
}

impl<E: SoftDeletable> Probe<E> {
    /// Classify the result of an inner `get`.
    ///
    /// `NotFound` means absent. Any other error is not a probe outcome and is
    /// returned unchanged.
    pub fn classify(lookup: StoreResult<E>) -> StoreResult<Self> {
        match lookup {
            Ok(entity) if entity.is_deleted() => Ok(Probe::Tombstoned),
            Ok(entity) => Ok(Probe::Active(entity)),
            Err(err) if err.is_not_found() => Ok(Probe::Absent(err)),
            Err(err) => Err(err),
        }
    }

    pub fn state(&self) -> VisibilityState {
        match self {
            Probe::Active(_) => VisibilityState::Active,
            Probe::Tombstoned => VisibilityState::Tombstoned,
            Probe::Absent(_) => VisibilityState::Absent,
        }
    }

    /// The active record, or `NotFound` for both absent and tombstoned.
    ///
    /// An absent record yields the wrapped store's own error unchanged; a
    /// tombstone yields a fresh `NotFound` for `id`.
    pub fn into_active(self, id: &impl Identity) -> StoreResult<E> {
        match self {
            Probe::Active(entity) => Ok(entity),
            Probe::Tombstoned => Err(StoreError::not_found(id)),
            Probe::Absent(err) => Err(err),
        }
    }
}

impl VisibilityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityState::Absent => "absent",
            VisibilityState::Active => "active",
            VisibilityState::Tombstoned => "tombstoned",
        }
    }
}
