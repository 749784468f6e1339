//! Entity model shared by every store layer.
//!
//! Entities embed their metadata by value instead of inheriting it:
//!
//! ```ignore
//! #[derive(Clone, Serialize, Deserialize)]
//! pub struct Widget {
//!     pub id: Uuid,
//!     pub name: String,
//!     #[serde(flatten)]
//!     pub audit: AuditFields,
//!     #[serde(flatten)]
//!     pub deletion: DeletionFields,
//! }
//! ```
//!
//! Declaring the identity first, type-specific fields next and the flattened
//! groups last yields the wire order `id, .., createdBy, createdDateTime,
//! updatedBy, updatedDateTime, deletedBy, deletedDateTime, isDeleted`.

use serde::{Deserialize, Serialize};

use crate::identity::{Identity, Timestamp};

/// Creation and update provenance.
///
/// Every field stays `None` until the first write through the audit-stamping
/// layer, which is the only component expected to set them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFields {
    pub created_by: Option<String>,
    pub created_date_time: Option<Timestamp>,
    pub updated_by: Option<String>,
    pub updated_date_time: Option<Timestamp>,
}

impl AuditFields {
    /// Overwrite the creation attribution.
    pub fn stamp_created(&mut self, by: &str, at: Timestamp) {
        self.created_by = Some(by.to_string());
        self.created_date_time = Some(at);
    }

    /// Set each creation field only if it is currently unset.
    pub fn stamp_created_if_unset(&mut self, by: &str, at: Timestamp) {
        if self.created_by.is_none() {
            self.created_by = Some(by.to_string());
        }
        if self.created_date_time.is_none() {
            self.created_date_time = Some(at);
        }
    }

    /// Overwrite the update attribution.
    pub fn stamp_updated(&mut self, by: &str, at: Timestamp) {
        self.updated_by = Some(by.to_string());
        self.updated_date_time = Some(at);
    }

    /// True once both creation fields have been written.
    pub fn is_created(&self) -> bool {
        self.created_by.is_some() && self.created_date_time.is_some()
    }
}

/// Soft-delete metadata.
///
/// `is_deleted` is tri-state: `None` (never written), `Some(false)` (active)
/// and `Some(true)` (tombstoned).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionFields {
    pub deleted_by: Option<String>,
    pub deleted_date_time: Option<Timestamp>,
    pub is_deleted: Option<bool>,
}

impl DeletionFields {
    /// Mark as tombstoned by `by` at `at`.
    pub fn mark_deleted(&mut self, by: &str, at: Timestamp) {
        self.is_deleted = Some(true);
        self.deleted_by = Some(by.to_string());
        self.deleted_date_time = Some(at);
    }

    /// Reset to the active state with no deletion attribution.
    pub fn clear(&mut self) {
        self.is_deleted = Some(false);
        self.deleted_by = None;
        self.deleted_date_time = None;
    }

    /// Only an explicit `Some(true)` counts as deleted.
    pub fn is_deleted(&self) -> bool {
        self.is_deleted == Some(true)
    }
}

/// Base entity shape: an identity plus audit provenance.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Identity type of this entity.
    type Id: Identity;

    /// The identity of this record.
    fn identity(&self) -> &Self::Id;

    /// Replace the identity of this record.
    fn set_identity(&mut self, id: Self::Id);

    /// Audit provenance.
    fn audit(&self) -> &AuditFields;

    /// Mutable audit provenance.
    fn audit_mut(&mut self) -> &mut AuditFields;
}

/// Entity that can be logically deleted.
pub trait SoftDeletable: Entity {
    /// Soft-delete metadata.
    fn deletion(&self) -> &DeletionFields;

    /// Mutable soft-delete metadata.
    fn deletion_mut(&mut self) -> &mut DeletionFields;

    /// Whether this record is currently tombstoned.
    fn is_deleted(&self) -> bool {
        self.deletion().is_deleted()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Sample {
        id: String,
        label: String,
        #[serde(flatten)]
        audit: AuditFields,
        #[serde(flatten)]
        deletion: DeletionFields,
    }

    #[test]
    fn test_stamp_created_overwrites() {
        let earlier = Utc::now() - Duration::days(3);
        let mut audit = AuditFields {
            created_by: Some("forged".to_string()),
            created_date_time: Some(earlier),
            ..Default::default()
        };
        let now = Utc::now();
        audit.stamp_created("svc-a", now);
        assert_eq!(audit.created_by.as_deref(), Some("svc-a"));
        assert_eq!(audit.created_date_time, Some(now));
        assert!(audit.updated_by.is_none());
    }

    #[test]
    fn test_stamp_created_if_unset_preserves_each_field() {
        let earlier = Utc::now() - Duration::hours(1);
        let mut audit = AuditFields {
            created_by: Some("original".to_string()),
            ..Default::default()
        };
        let now = Utc::now();
        audit.stamp_created_if_unset("svc-b", now);
        assert_eq!(audit.created_by.as_deref(), Some("original"));
        assert_eq!(audit.created_date_time, Some(now));

        let mut full = AuditFields {
            created_by: Some("original".to_string()),
            created_date_time: Some(earlier),
            ..Default::default()
        };
        full.stamp_created_if_unset("svc-b", now);
        assert_eq!(full.created_date_time, Some(earlier));
        assert!(full.is_created());
    }

    #[test]
    fn test_deletion_tri_state() {
        let mut deletion = DeletionFields::default();
        assert!(!deletion.is_deleted());
        deletion.mark_deleted("svc-c", Utc::now());
        assert!(deletion.is_deleted());
        assert_eq!(deletion.deleted_by.as_deref(), Some("svc-c"));
        deletion.clear();
        assert_eq!(deletion.is_deleted, Some(false));
        assert!(deletion.deleted_by.is_none());
        assert!(deletion.deleted_date_time.is_none());
    }

    #[test]
    fn test_wire_field_order() {
        let sample = Sample {
            id: "E1".to_string(),
            label: "first".to_string(),
            audit: AuditFields::default(),
            deletion: DeletionFields::default(),
        };
        let json = serde_json::to_string(&sample).unwrap();
        let order = [
            "\"id\"",
            "\"label\"",
            "\"createdBy\"",
            "\"createdDateTime\"",
            "\"updatedBy\"",
            "\"updatedDateTime\"",
            "\"deletedBy\"",
            "\"deletedDateTime\"",
            "\"isDeleted\"",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|key| json.find(key).unwrap_or_else(|| panic!("missing {key} in {json}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn test_missing_metadata_deserializes_as_unset() {
        let sample: Sample = serde_json::from_str(r#"{"id":"E2","label":"bare"}"#).unwrap();
        assert_eq!(sample.audit, AuditFields::default());
        assert_eq!(sample.deletion.is_deleted, None);
    }
}
