//! Metrics collected during a repair run

use std::time::Duration;

/// Counters of a repair run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Items read from the project
    pub items_scanned: usize,

    /// Text fields inspected
    pub fields_scanned: usize,

    /// Distinct anchors inspected
    pub anchors_inspected: usize,

    /// Distinct anchors corrected
    pub links_fixed: usize,

    /// Anchors that looked broken but could not be corrected
    pub links_unresolved: usize,

    /// Fields with at least one corrected anchor
    pub fields_corrected: usize,

    /// Items successfully patched
    pub items_patched: usize,

    /// Items diverted to the lock report
    pub items_locked: usize,

    /// Items whose patch failed for another reason
    pub patch_failures: usize,

    /// Items that would have been patched in dry-run mode
    pub items_planned: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Items that had at least one corrected field
    pub fn items_with_corrections(&self) -> usize {
        self.items_patched + self.items_locked + self.patch_failures + self.items_planned
    }

    /// Generate a summary report of the metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Link Repair Summary".to_string(),
            "===================".to_string(),
            format!("Items scanned: {}", self.items_scanned),
            format!("Fields scanned: {}", self.fields_scanned),
            format!("Hyperlinks inspected: {}", self.anchors_inspected),
            format!("Hyperlinks corrected: {}", self.links_fixed),
            format!("Hyperlinks left unresolved: {}", self.links_unresolved),
            format!("Fields corrected: {}", self.fields_corrected),
            String::new(),
            format!("Items patched: {}", self.items_patched),
            format!("Items locked: {}", self.items_locked),
            format!("Patch failures: {}", self.patch_failures),
        ];

        if self.items_planned > 0 {
            lines.push(format!("Items planned (dry run): {}", self.items_planned));
        }

        lines.push(format!(
            "Total execution time: {:.2} seconds",
            self.elapsed.as_secs_f64()
        ));
        lines.join("\n")
    }
}
