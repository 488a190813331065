//! `SyncResolver` backed by an item repository

use linkfix_domain::traits::{ItemRepository, SyncResolution, SyncResolver};
use linkfix_domain::{ItemId, ProjectId, SyncedItem};
use std::cell::RefCell;
use std::collections::HashMap;

/// Resolves sync counterparts and display values through a repository
///
/// Answers are cached for the lifetime of the resolver: the same target is
/// typically linked from many items of a project, and every lookup is a
/// network round trip.
pub struct RepositoryResolver<'a, R> {
    repository: &'a R,
    synced: RefCell<HashMap<ItemId, Vec<SyncedItem>>>,
    display: RefCell<HashMap<(ItemId, String), Option<String>>>,
}

impl<'a, R: ItemRepository> RepositoryResolver<'a, R> {
    /// Create a resolver with empty caches
    pub fn new(repository: &'a R) -> Self {
        Self {
            repository,
            synced: RefCell::new(HashMap::new()),
            display: RefCell::new(HashMap::new()),
        }
    }
}

impl<R: ItemRepository> SyncResolver for RepositoryResolver<'_, R> {
    type Error = R::Error;

    fn resolve_in_project(
        &self,
        item: ItemId,
        project: ProjectId,
    ) -> Result<SyncResolution, Self::Error> {
        if let Some(synced) = self.synced.borrow().get(&item) {
            return Ok(SyncResolution::from_synced(synced, project));
        }

        let synced = self.repository.get_synced_items(item)?;
        let resolution = SyncResolution::from_synced(&synced, project);
        self.synced.borrow_mut().insert(item, synced);
        Ok(resolution)
    }

    fn display_value(&self, item: ItemId, attribute: &str) -> Result<Option<String>, Self::Error> {
        let key = (item, attribute.to_string());
        if let Some(value) = self.display.borrow().get(&key) {
            return Ok(value.clone());
        }

        let value = self
            .repository
            .get_item(item)?
            .display_value(attribute)
            .map(str::to_string);
        self.display.borrow_mut().insert(key, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfix_domain::Item;
    use linkfix_sdk::MockRepository;

    fn repository() -> MockRepository {
        let mut repo = MockRepository::new();
        let original = Item::new(ItemId::new(100), ProjectId::new(5), "OLD-100");
        let copy = Item::new(ItemId::new(200), ProjectId::new(7), "NEW-100");
        repo.add_item(original.clone());
        repo.add_item(copy.clone());
        repo.link_synced(&original, &copy);
        repo
    }

    #[test]
    fn test_resolves_unique_counterpart() {
        let repo = repository();
        let resolver = RepositoryResolver::new(&repo);

        assert_eq!(
            resolver
                .resolve_in_project(ItemId::new(100), ProjectId::new(7))
                .unwrap(),
            SyncResolution::Unique(ItemId::new(200))
        );
        assert_eq!(
            resolver
                .resolve_in_project(ItemId::new(100), ProjectId::new(9))
                .unwrap(),
            SyncResolution::NotFound
        );
    }

    #[test]
    fn test_display_values_are_cached() {
        let repo = repository();
        let resolver = RepositoryResolver::new(&repo);

        for _ in 0..3 {
            assert_eq!(
                resolver
                    .display_value(ItemId::new(200), "documentKey")
                    .unwrap()
                    .as_deref(),
                Some("NEW-100")
            );
        }
        assert_eq!(repo.item_reads(), 1);
    }

    #[test]
    fn test_missing_item_is_an_error() {
        let repo = repository();
        let resolver = RepositoryResolver::new(&repo);
        assert!(resolver.display_value(ItemId::new(999), "name").is_err());
    }
}
