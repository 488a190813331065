//! Records produced by a repair run

use crate::{ItemId, UserId};

/// A field whose links were corrected
///
/// Created only when at least one anchor in the field actually changed.
/// Consumed by the patch step, or by the lock report when the item cannot be
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRecord {
    /// Item owning the field
    pub item_id: ItemId,
    /// Field name as used in the patch path
    pub field_name: String,
    /// Field value before correction
    pub old_value: String,
    /// Field value after correction
    pub new_value: String,
    /// Number of distinct anchors fixed in this field
    pub links_fixed: usize,
    /// Document key of the owning item
    pub document_key: String,
    /// Lock owner of the item at scan time
    pub lock_owner: Option<UserId>,
    /// Browser URL of the item
    pub item_url: String,
}

/// One row of the locked-items report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedItemRow {
    /// Document key, unique within a report
    pub document_key: String,
    /// Display name of the lock owner
    pub locked_by: String,
    /// Browser URL of the item
    pub item_url: String,
}
