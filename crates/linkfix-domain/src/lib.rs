//! Linkfix Domain Layer
//!
//! Core data model and capability traits for repairing cross-project links
//! inside rich-text fields of requirements-management items. This crate has
//! no external dependencies; the REST client, the link corrector and the
//! CLI all build on the types defined here.
//!
//! ## Key Concepts
//!
//! - **Item**: a requirement/test/etc. with a document key, rich-text fields
//!   and a lock state
//! - **Synced item**: a duplicate of an item living in another project
//! - **Correction record**: the before/after value of one field whose links
//!   were repaired
//! - **Locked item row**: an entry of the report of items that could not be
//!   patched because somebody holds a lock on them
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Trait definitions for every remote interaction (`ItemRepository`,
//!   `SyncResolver`) so the correction logic runs against fakes in tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod correction;
pub mod ids;
pub mod item;
pub mod traits;

// Re-exports for convenience
pub use correction::{CorrectionRecord, LockedItemRow};
pub use ids::{ItemId, ProjectId, UserId};
pub use item::{FieldValue, Item, LockState, Project, SyncedItem, User};
pub use traits::{ItemRepository, LockConflict, PatchOperation, SyncResolution, SyncResolver};
