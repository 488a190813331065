//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the correction logic and the
//! remote system. Infrastructure implementations live in other crates.

use crate::{Item, ItemId, Project, ProjectId, SyncedItem, User, UserId};

/// A single JSON-patch style operation on an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOperation {
    /// Operation name, always `replace` for link corrections
    pub op: String,
    /// Target path, e.g. `/fields/description`
    pub path: String,
    /// New value
    pub value: String,
}

impl PatchOperation {
    /// Replace the value of one field
    ///
    /// # Examples
    ///
    /// ```
    /// use linkfix_domain::PatchOperation;
    ///
    /// let op = PatchOperation::replace_field("description", "<p>new</p>");
    /// assert_eq!(op.op, "replace");
    /// assert_eq!(op.path, "/fields/description");
    /// ```
    pub fn replace_field(field_name: &str, value: impl Into<String>) -> Self {
        Self {
            op: "replace".to_string(),
            path: format!("/fields/{}", field_name),
            value: value.into(),
        }
    }
}

/// Trait for reading and writing items of the remote repository
///
/// Implemented by the infrastructure layer (linkfix-sdk)
pub trait ItemRepository {
    /// Error type for repository operations
    type Error;

    /// List all projects visible to the authenticated user
    fn list_projects(&self) -> Result<Vec<Project>, Self::Error>;

    /// List all items of a project
    fn list_items(&self, project: ProjectId) -> Result<Vec<Item>, Self::Error>;

    /// Get a single item
    fn get_item(&self, id: ItemId) -> Result<Item, Self::Error>;

    /// Get the other members of an item's sync pool
    fn get_synced_items(&self, id: ItemId) -> Result<Vec<SyncedItem>, Self::Error>;

    /// Get a user account
    fn get_user(&self, id: UserId) -> Result<User, Self::Error>;

    /// Apply all operations to one item in a single request
    fn patch_item(&self, id: ItemId, operations: &[PatchOperation]) -> Result<(), Self::Error>;
}

/// Errors that can tell whether a write was refused because of a lock
pub trait LockConflict {
    /// Whether the target item is locked by somebody else
    fn is_lock_conflict(&self) -> bool;
}

/// Outcome of looking for an item's counterpart in a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResolution {
    /// Exactly one synced item lives in the project
    Unique(ItemId),
    /// No synced item lives in the project
    NotFound,
    /// Several synced items live in the project; picking one would be a guess
    Ambiguous(Vec<ItemId>),
}

impl SyncResolution {
    /// Classify a list of synced items by the project they belong to
    ///
    /// # Examples
    ///
    /// ```
    /// use linkfix_domain::{ItemId, ProjectId, SyncResolution, SyncedItem};
    ///
    /// let synced = [
    ///     SyncedItem { id: ItemId::new(200), project: ProjectId::new(7) },
    ///     SyncedItem { id: ItemId::new(300), project: ProjectId::new(8) },
    /// ];
    /// assert_eq!(
    ///     SyncResolution::from_synced(&synced, ProjectId::new(7)),
    ///     SyncResolution::Unique(ItemId::new(200))
    /// );
    /// ```
    pub fn from_synced(synced: &[SyncedItem], project: ProjectId) -> Self {
        let mut matches: Vec<ItemId> = synced
            .iter()
            .filter(|s| s.project == project)
            .map(|s| s.id)
            .collect();
        matches.sort_unstable();
        matches.dedup();

        match matches.len() {
            0 => SyncResolution::NotFound,
            1 => SyncResolution::Unique(matches[0]),
            _ => SyncResolution::Ambiguous(matches),
        }
    }
}

/// Capability the link corrector needs from the outside world
///
/// Implemented over an `ItemRepository` by the corrector crate and by fakes
/// in tests.
pub trait SyncResolver {
    /// Error type for resolution operations
    type Error;

    /// Find the item corresponding to `item` inside `project`
    fn resolve_in_project(
        &self,
        item: ItemId,
        project: ProjectId,
    ) -> Result<SyncResolution, Self::Error>;

    /// Current value of the display attribute of an item
    ///
    /// Returns `Ok(None)` when the item exists but has no such attribute.
    fn display_value(&self, item: ItemId, attribute: &str) -> Result<Option<String>, Self::Error>;
}
