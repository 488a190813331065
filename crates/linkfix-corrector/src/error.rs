//! Error types for the link corrector

use linkfix_domain::{ItemId, ProjectId};
use thiserror::Error;

/// Reasons an anchor cannot be corrected
///
/// None of these abort a field or a run; the anchor is logged and skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrectorError {
    /// Same-instance link without recognizable project/item ids
    #[error("Unable to extract project and item id from link: {0}")]
    InvalidLink(String),

    /// No synced counterpart of the linked item in the current project
    #[error("Unable to find a synced item for item [{item}] in project [{project}]")]
    NoSyncedItem {
        /// Linked item
        item: ItemId,
        /// Current project
        project: ProjectId,
    },

    /// Several synced counterparts; refusing to guess
    #[error("Multiple synced items found for item [{item}] in project [{project}]: {candidates:?}")]
    AmbiguousSync {
        /// Linked item
        item: ItemId,
        /// Current project
        project: ProjectId,
        /// Candidate ids
        candidates: Vec<u64>,
    },

    /// Target item has no value for the display attribute
    #[error("Item [{item}] has no value for display attribute '{attribute}'")]
    MissingDisplayValue {
        /// Target item
        item: ItemId,
        /// Attribute name
        attribute: String,
    },

    /// The resolver itself failed (network, API)
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
