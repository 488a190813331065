//! Orchestration of one repair run

use crate::batcher::{PatchBatcher, PatchOutcome};
use crate::lock_report::{LockReport, OwnerDirectory};
use crate::scan::{ItemCorrections, Scanner};
use crate::{RepairError, RepairOptions, RunMetrics};
use linkfix_corrector::{LinkCorrector, RepositoryResolver};
use linkfix_domain::traits::{ItemRepository, LockConflict};
use linkfix_domain::{LockedItemRow, UserId};
use std::fmt::Display;
use std::time::Instant;
use tracing::{info, warn};

/// Result of a repair run
#[derive(Debug, Clone)]
pub struct RepairReport {
    /// Counters of the run
    pub metrics: RunMetrics,
    /// Items whose corrections could not be written because of a lock
    pub lock_report: LockReport,
    /// Document keys of items whose patch failed for another reason
    pub failed_items: Vec<String>,
}

/// Scans a project, corrects its links and patches the changed items
///
/// # Examples
///
/// ```
/// use linkfix_corrector::CorrectorConfig;
/// use linkfix_domain::{Item, ItemId, ProjectId};
/// use linkfix_repair::{RepairOptions, Repairer};
/// use linkfix_sdk::MockRepository;
///
/// let mut repo = MockRepository::new();
/// repo.add_project(ProjectId::new(7), "Copy");
/// let original = Item::new(ItemId::new(100), ProjectId::new(5), "OLD-100");
/// let copy = Item::new(ItemId::new(200), ProjectId::new(7), "NEW-100");
/// repo.add_item(original.clone());
/// repo.add_item(copy.clone());
/// repo.link_synced(&original, &copy);
/// repo.add_item(
///     Item::new(ItemId::new(300), ProjectId::new(7), "REQ-300").with_text_field(
///         "description",
///         r#"<a href="https://h/path?projectId=5&docId=100">Old</a>"#,
///     ),
/// );
///
/// let options = RepairOptions::new(ProjectId::new(7), "https://h", CorrectorConfig::new("h"));
/// let report = Repairer::new(options).unwrap().run(&repo).unwrap();
///
/// assert_eq!(report.metrics.links_fixed, 1);
/// assert_eq!(report.metrics.items_patched, 1);
/// ```
pub struct Repairer {
    options: RepairOptions,
    corrector: LinkCorrector,
}

impl Repairer {
    /// Create a repairer, validating the options
    pub fn new(options: RepairOptions) -> Result<Self, RepairError> {
        options.validate()?;
        let corrector = LinkCorrector::new(options.corrector.clone());
        Ok(Self { options, corrector })
    }

    /// Options of this repairer
    pub fn options(&self) -> &RepairOptions {
        &self.options
    }

    /// Run the repair over every item of the configured project
    ///
    /// Fails only when the project is unknown or cannot be listed. Problems
    /// with single links or items are logged and counted.
    pub fn run<R>(&self, repository: &R) -> Result<RepairReport, RepairError>
    where
        R: ItemRepository,
        R::Error: LockConflict + Display,
    {
        let start = Instant::now();
        let project = self.options.project;

        let projects = repository
            .list_projects()
            .map_err(|e| RepairError::Repository(e.to_string()))?;
        let Some(found) = projects.iter().find(|p| p.id == project) else {
            return Err(RepairError::InvalidProject(project));
        };
        info!(
            "Repairing links of project [{}]{}",
            project,
            found
                .name
                .as_deref()
                .map(|name| format!(" ({})", name))
                .unwrap_or_default()
        );

        let items = repository
            .list_items(project)
            .map_err(|e| RepairError::Repository(e.to_string()))?;
        info!("Found {} item(s)", items.len());

        let resolver = RepositoryResolver::new(repository);
        let owners = OwnerDirectory::new(repository);
        let scanner = Scanner::new(&self.corrector, &self.options);
        let batcher = PatchBatcher::new(self.options.dry_run);

        let mut metrics = RunMetrics::new();
        let mut lock_report = LockReport::new();
        let mut failed_items = Vec::new();
        let total = items.len();

        for (index, item) in items.iter().enumerate() {
            info!("[{}/{}] {}", index + 1, total, item.document_key);

            let Some(corrections) = scanner.scan_item(&resolver, item, &mut metrics) else {
                continue;
            };

            match batcher.apply(repository, &corrections) {
                PatchOutcome::Patched => metrics.items_patched += 1,
                PatchOutcome::DryRun => metrics.items_planned += 1,
                PatchOutcome::Locked => {
                    metrics.items_locked += 1;
                    let owner = lock_owner(repository, &corrections);
                    lock_report.add(LockedItemRow {
                        document_key: corrections.document_key.clone(),
                        locked_by: owners.name_of(owner),
                        item_url: corrections.item_url.clone(),
                    });
                }
                PatchOutcome::Failed(_) => {
                    metrics.patch_failures += 1;
                    failed_items.push(corrections.document_key.clone());
                }
            }
        }

        metrics.elapsed = start.elapsed();
        info!(
            "Done: {} link(s) fixed, {} item(s) patched, {} locked, {} failed",
            metrics.links_fixed, metrics.items_patched, metrics.items_locked, metrics.patch_failures
        );

        Ok(RepairReport {
            metrics,
            lock_report,
            failed_items,
        })
    }
}

/// Owner known at scan time, else the current owner
///
/// Items locked between scan and patch carry no owner from the scan.
fn lock_owner<R>(repository: &R, corrections: &ItemCorrections) -> Option<UserId>
where
    R: ItemRepository,
    R::Error: Display,
{
    corrections.lock.locked_by.or_else(|| {
        match repository.get_item(corrections.item_id) {
            Ok(item) => item.lock.locked_by,
            Err(e) => {
                warn!(
                    "Could not read lock owner of item [{}]: {}",
                    corrections.item_id, e
                );
                None
            }
        }
    })
}
