//! Sending corrected field values back to the repository

use crate::scan::ItemCorrections;
use linkfix_domain::traits::{ItemRepository, LockConflict};
use std::fmt::Display;
use tracing::{error, info, warn};

/// What happened to the corrections of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The patch was accepted
    Patched,
    /// The item is locked; its corrections belong in the lock report
    Locked,
    /// The patch failed for another reason; the item keeps its old values
    Failed(String),
    /// Dry run: the patch was only logged
    DryRun,
}

/// Issues one patch per item with all of its corrected fields
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchBatcher {
    dry_run: bool,
}

impl PatchBatcher {
    /// Create a batcher
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Apply the corrections of one item
    ///
    /// Items locked at scan time are never sent. A refused patch whose error
    /// names a lock is reported as [`PatchOutcome::Locked`]; other failures
    /// are not retried.
    pub fn apply<R>(&self, repository: &R, corrections: &ItemCorrections) -> PatchOutcome
    where
        R: ItemRepository,
        R::Error: LockConflict + Display,
    {
        if corrections.lock.locked {
            warn!(
                "{} is locked, {} field(s) left for the lock report",
                corrections.document_key,
                corrections.records.len()
            );
            return PatchOutcome::Locked;
        }

        for record in &corrections.records {
            info!(
                "{} field [{}] old value: {}",
                corrections.document_key, record.field_name, record.old_value
            );
            info!(
                "{} field [{}] new value: {}",
                corrections.document_key, record.field_name, record.new_value
            );
        }

        if self.dry_run {
            info!(
                "Dry run: would patch {} with {} field(s)",
                corrections.document_key,
                corrections.records.len()
            );
            return PatchOutcome::DryRun;
        }

        match repository.patch_item(corrections.item_id, &corrections.patch_operations()) {
            Ok(()) => {
                info!(
                    "Patched {} ({} link(s))",
                    corrections.document_key,
                    corrections.links_fixed()
                );
                PatchOutcome::Patched
            }
            Err(e) if e.is_lock_conflict() => {
                warn!("{} was locked while patching: {}", corrections.document_key, e);
                PatchOutcome::Locked
            }
            Err(e) => {
                error!("Failed to patch {}: {}", corrections.document_key, e);
                PatchOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfix_domain::{CorrectionRecord, Item, ItemId, LockState, ProjectId, UserId};
    use linkfix_sdk::MockRepository;

    fn corrections(lock: LockState) -> ItemCorrections {
        ItemCorrections {
            item_id: ItemId::new(1),
            document_key: "REQ-1".to_string(),
            item_url: "https://h/perspective.req#/items/1?projectId=7".to_string(),
            lock,
            records: vec![
                CorrectionRecord {
                    item_id: ItemId::new(1),
                    field_name: "description".to_string(),
                    old_value: "old".to_string(),
                    new_value: "new".to_string(),
                    links_fixed: 1,
                    document_key: "REQ-1".to_string(),
                    lock_owner: lock.locked_by,
                    item_url: String::new(),
                },
                CorrectionRecord {
                    item_id: ItemId::new(1),
                    field_name: "notes".to_string(),
                    old_value: "old notes".to_string(),
                    new_value: "new notes".to_string(),
                    links_fixed: 2,
                    document_key: "REQ-1".to_string(),
                    lock_owner: lock.locked_by,
                    item_url: String::new(),
                },
            ],
        }
    }

    fn repository() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_item(Item::new(ItemId::new(1), ProjectId::new(7), "REQ-1"));
        repo
    }

    #[test]
    fn test_one_patch_per_item() {
        let repo = repository();
        let outcome = PatchBatcher::new(false).apply(&repo, &corrections(LockState::unlocked()));

        assert_eq!(outcome, PatchOutcome::Patched);
        let patches = repo.patches();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].1.len(), 2);
        assert_eq!(patches[0].1[1].path, "/fields/notes");
    }

    #[test]
    fn test_locked_item_is_never_sent() {
        let repo = repository();
        let outcome = PatchBatcher::new(false).apply(
            &repo,
            &corrections(LockState::locked_by(UserId::new(3))),
        );

        assert_eq!(outcome, PatchOutcome::Locked);
        assert!(repo.patches().is_empty());
    }

    #[test]
    fn test_lock_error_is_redirected() {
        let mut repo = repository();
        repo.fail_patch(ItemId::new(1), 400, "Item is locked by another user");

        let outcome = PatchBatcher::new(false).apply(&repo, &corrections(LockState::unlocked()));
        assert_eq!(outcome, PatchOutcome::Locked);
    }

    #[test]
    fn test_other_errors_fail() {
        let mut repo = repository();
        repo.fail_patch(ItemId::new(1), 500, "Internal error");

        let outcome = PatchBatcher::new(false).apply(&repo, &corrections(LockState::unlocked()));
        assert!(matches!(outcome, PatchOutcome::Failed(message) if message.contains("Internal error")));
    }

    #[test]
    fn test_dry_run_sends_nothing() {
        let repo = repository();
        let outcome = PatchBatcher::new(true).apply(&repo, &corrections(LockState::unlocked()));

        assert_eq!(outcome, PatchOutcome::DryRun);
        assert!(repo.patches().is_empty());
    }
}
