//! In-memory repository for deterministic testing
//!
//! Behaves like the REST API from the point of view of the repair logic
//! without any network calls. Patches are applied to the stored items and
//! recorded so tests can assert on them.

use crate::error::SdkError;
use linkfix_domain::traits::{ItemRepository, PatchOperation};
use linkfix_domain::{FieldValue, Item, ItemId, Project, ProjectId, SyncedItem, User, UserId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockState {
    items: BTreeMap<ItemId, Item>,
    patches: Vec<(ItemId, Vec<PatchOperation>)>,
    patch_failures: HashMap<ItemId, (u16, String)>,
    item_reads: usize,
}

/// Mock repository
///
/// # Examples
///
/// ```
/// use linkfix_domain::{Item, ItemId, ItemRepository, ProjectId};
/// use linkfix_sdk::MockRepository;
///
/// let mut repo = MockRepository::new();
/// repo.add_project(ProjectId::new(7), "Synced copy");
/// repo.add_item(Item::new(ItemId::new(1), ProjectId::new(7), "REQ-1"));
///
/// assert_eq!(repo.list_items(ProjectId::new(7)).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    projects: Vec<Project>,
    synced: HashMap<ItemId, Vec<SyncedItem>>,
    users: HashMap<UserId, User>,
    state: Arc<Mutex<MockState>>,
}

impl MockRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project
    pub fn add_project(&mut self, id: ProjectId, name: impl Into<String>) {
        self.projects.push(Project {
            id,
            name: Some(name.into()),
        });
    }

    /// Store an item, replacing any item with the same id
    pub fn add_item(&mut self, item: Item) {
        self.lock_state().items.insert(item.id, item);
    }

    /// Declare `a` and `b` members of the same sync pool
    ///
    /// Both directions are recorded, like the API reports them.
    pub fn link_synced(&mut self, a: &Item, b: &Item) {
        self.synced.entry(a.id).or_default().push(SyncedItem {
            id: b.id,
            project: b.project,
        });
        self.synced.entry(b.id).or_default().push(SyncedItem {
            id: a.id,
            project: a.project,
        });
    }

    /// Register a user
    pub fn add_user(&mut self, id: UserId, first_name: &str, last_name: &str) {
        self.users.insert(
            id,
            User {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            },
        );
    }

    /// Make every patch of `id` fail with the given status and message
    pub fn fail_patch(&mut self, id: ItemId, status: u16, message: impl Into<String>) {
        self.lock_state()
            .patch_failures
            .insert(id, (status, message.into()));
    }

    /// Patches applied so far, in order
    pub fn patches(&self) -> Vec<(ItemId, Vec<PatchOperation>)> {
        self.lock_state().patches.clone()
    }

    /// Number of single-item reads served
    pub fn item_reads(&self) -> usize {
        self.lock_state().item_reads
    }

    /// Current stored copy of an item
    pub fn item(&self, id: ItemId) -> Option<Item> {
        self.lock_state().items.get(&id).cloned()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned mutex only means another test thread panicked
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ItemRepository for MockRepository {
    type Error = SdkError;

    fn list_projects(&self) -> Result<Vec<Project>, SdkError> {
        Ok(self.projects.clone())
    }

    fn list_items(&self, project: ProjectId) -> Result<Vec<Item>, SdkError> {
        Ok(self
            .lock_state()
            .items
            .values()
            .filter(|item| item.project == project)
            .cloned()
            .collect())
    }

    fn get_item(&self, id: ItemId) -> Result<Item, SdkError> {
        let mut state = self.lock_state();
        state.item_reads += 1;
        state
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| SdkError::NotFound(format!("item {}", id)))
    }

    fn get_synced_items(&self, id: ItemId) -> Result<Vec<SyncedItem>, SdkError> {
        Ok(self.synced.get(&id).cloned().unwrap_or_default())
    }

    fn get_user(&self, id: UserId) -> Result<User, SdkError> {
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| SdkError::NotFound(format!("user {}", id)))
    }

    fn patch_item(&self, id: ItemId, operations: &[PatchOperation]) -> Result<(), SdkError> {
        let mut state = self.lock_state();

        if let Some((status, message)) = state.patch_failures.get(&id) {
            return Err(SdkError::Api {
                status: *status,
                message: message.clone(),
            });
        }

        let item = state
            .items
            .get_mut(&id)
            .ok_or_else(|| SdkError::NotFound(format!("item {}", id)))?;

        if item.lock.locked {
            return Err(SdkError::Api {
                status: 400,
                message: format!("Item {} is locked", id),
            });
        }

        for op in operations {
            let field = op.path.strip_prefix("/fields/").ok_or_else(|| SdkError::Api {
                status: 400,
                message: format!("Unsupported patch path {}", op.path),
            })?;
            item.fields
                .insert(field.to_string(), FieldValue::Text(op.value.clone()));
        }

        state.patches.push((id, operations.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfix_domain::{LockConflict, LockState};

    #[test]
    fn test_patch_updates_item() {
        let mut repo = MockRepository::new();
        repo.add_item(
            Item::new(ItemId::new(1), ProjectId::new(7), "REQ-1")
                .with_text_field("description", "old"),
        );

        repo.patch_item(
            ItemId::new(1),
            &[PatchOperation::replace_field("description", "new")],
        )
        .unwrap();

        let item = repo.item(ItemId::new(1)).unwrap();
        assert_eq!(item.display_value("description"), Some("new"));
        assert_eq!(repo.patches().len(), 1);
    }

    #[test]
    fn test_patch_rejected_when_locked() {
        let mut repo = MockRepository::new();
        repo.add_item(
            Item::new(ItemId::new(1), ProjectId::new(7), "REQ-1")
                .with_lock(LockState::locked_by(UserId::new(2))),
        );

        let err = repo
            .patch_item(ItemId::new(1), &[PatchOperation::replace_field("name", "x")])
            .unwrap_err();
        assert!(err.is_lock_conflict());
        assert!(repo.patches().is_empty());
    }

    #[test]
    fn test_synced_links_are_symmetric() {
        let mut repo = MockRepository::new();
        let original = Item::new(ItemId::new(100), ProjectId::new(5), "REQ-100");
        let copy = Item::new(ItemId::new(200), ProjectId::new(7), "REQ-200");
        repo.link_synced(&original, &copy);

        assert_eq!(
            repo.get_synced_items(ItemId::new(100)).unwrap(),
            vec![SyncedItem {
                id: ItemId::new(200),
                project: ProjectId::new(7)
            }]
        );
        assert_eq!(repo.get_synced_items(ItemId::new(200)).unwrap()[0].id, ItemId::new(100));
    }

    #[test]
    fn test_clone_shares_state() {
        let mut repo = MockRepository::new();
        repo.add_item(Item::new(ItemId::new(1), ProjectId::new(7), "REQ-1"));
        let other = repo.clone();

        other.get_item(ItemId::new(1)).unwrap();
        assert_eq!(repo.item_reads(), 1);
    }
}
