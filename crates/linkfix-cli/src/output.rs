//! Output formatting for the CLI.

use colored::*;
use linkfix_repair::{LockReport, RunMetrics};
use std::time::Duration;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format the counters of a run as a table.
    pub fn format_metrics(&self, metrics: &RunMetrics) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Count"]);

        let mut rows = vec![
            ("Items scanned", metrics.items_scanned),
            ("Fields scanned", metrics.fields_scanned),
            ("Hyperlinks inspected", metrics.anchors_inspected),
            ("Hyperlinks corrected", metrics.links_fixed),
            ("Hyperlinks unresolved", metrics.links_unresolved),
            ("Items patched", metrics.items_patched),
            ("Items locked", metrics.items_locked),
            ("Patch failures", metrics.patch_failures),
        ];
        if metrics.items_planned > 0 {
            rows.push(("Items planned (dry run)", metrics.items_planned));
        }

        for (label, count) in rows {
            builder.push_record([label.to_string(), count.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the locked items as a table.
    pub fn format_lock_report(&self, report: &LockReport) -> String {
        if report.is_empty() {
            return self.colorize("No locked items.", "green");
        }

        let mut builder = Builder::default();
        builder.push_record(["Document Key", "Locked By", "Item URL"]);
        for row in report.rows() {
            builder.push_record([
                row.document_key.as_str(),
                row.locked_by.as_str(),
                row.item_url.as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the total execution time.
    pub fn elapsed(&self, elapsed: Duration) -> String {
        self.info(&format!(
            "Total execution time: {:.2} seconds",
            elapsed.as_secs_f64()
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkfix_domain::LockedItemRow;

    #[test]
    fn test_metrics_table() {
        let formatter = Formatter::new(false);
        let metrics = RunMetrics {
            items_scanned: 12,
            links_fixed: 3,
            ..RunMetrics::default()
        };

        let output = formatter.format_metrics(&metrics);
        assert!(output.contains("Items scanned"));
        assert!(output.contains("12"));
        assert!(!output.contains("dry run"));
    }

    #[test]
    fn test_lock_table() {
        let formatter = Formatter::new(false);
        let mut report = LockReport::new();
        report.add(LockedItemRow {
            document_key: "REQ-9".to_string(),
            locked_by: "Ada Lovelace".to_string(),
            item_url: "https://h/perspective.req#/items/9?projectId=7".to_string(),
        });

        let output = formatter.format_lock_report(&report);
        assert!(output.contains("REQ-9"));
        assert!(output.contains("Ada Lovelace"));
    }

    #[test]
    fn test_empty_lock_report() {
        let formatter = Formatter::new(false);
        assert_eq!(
            formatter.format_lock_report(&LockReport::new()),
            "No locked items."
        );
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(
            formatter.elapsed(Duration::from_millis(2500)),
            "ℹ Total execution time: 2.50 seconds"
        );
    }
}
