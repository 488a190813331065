//! Options of a repair run

use crate::error::RepairError;
use linkfix_corrector::CorrectorConfig;
use linkfix_domain::{ItemId, ProjectId};

/// Options of a repair run
///
/// # Examples
///
/// ```
/// use linkfix_corrector::CorrectorConfig;
/// use linkfix_domain::{ItemId, ProjectId};
/// use linkfix_repair::RepairOptions;
///
/// let options = RepairOptions::new(
///     ProjectId::new(7),
///     "https://acme.example.com",
///     CorrectorConfig::new("acme.example.com"),
/// );
/// assert_eq!(
///     options.item_url(ItemId::new(200)),
///     "https://acme.example.com/perspective.req#/items/200?projectId=7"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RepairOptions {
    /// Project whose items are scanned and patched
    pub project: ProjectId,

    /// Instance URL without trailing slash, used for item URLs
    pub instance_url: String,

    /// Link corrector settings
    pub corrector: CorrectorConfig,

    /// Dry-run mode: log the patches that would be sent without sending them
    pub dry_run: bool,
}

impl RepairOptions {
    /// Create options for a project
    pub fn new(project: ProjectId, instance_url: &str, corrector: CorrectorConfig) -> Self {
        Self {
            project,
            instance_url: instance_url.trim_end_matches('/').to_string(),
            corrector,
            dry_run: false,
        }
    }

    /// Builder-style setter for dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Browser URL of an item of the configured project
    pub fn item_url(&self, item: ItemId) -> String {
        format!(
            "{}/perspective.req#/items/{}?projectId={}",
            self.instance_url, item, self.project
        )
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), RepairError> {
        if self.instance_url.is_empty() {
            return Err(RepairError::Config("instance_url must not be empty".to_string()));
        }
        self.corrector
            .validate()
            .map_err(|e| RepairError::Config(e.to_string()))
    }
}
