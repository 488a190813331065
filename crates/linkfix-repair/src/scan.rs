//! Scanning items for correctable links

use crate::{RepairOptions, RunMetrics};
use linkfix_corrector::{AnchorOutcome, FieldContext, LinkCorrector};
use linkfix_domain::traits::{PatchOperation, SyncResolver};
use linkfix_domain::{CorrectionRecord, Item, ItemId, LockState};
use std::fmt::Display;

/// All corrected fields of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCorrections {
    /// Item the fields belong to
    pub item_id: ItemId,
    /// Document key of the item
    pub document_key: String,
    /// Browser URL of the item
    pub item_url: String,
    /// Lock state at scan time
    pub lock: LockState,
    /// One record per changed field, in field name order
    pub records: Vec<CorrectionRecord>,
}

impl ItemCorrections {
    /// One `replace` operation per changed field
    pub fn patch_operations(&self) -> Vec<PatchOperation> {
        self.records
            .iter()
            .map(|record| PatchOperation::replace_field(&record.field_name, record.new_value.as_str()))
            .collect()
    }

    /// Links fixed across all fields
    pub fn links_fixed(&self) -> usize {
        self.records.iter().map(|record| record.links_fixed).sum()
    }
}

/// Runs the link corrector over every text field of an item
pub struct Scanner<'a> {
    corrector: &'a LinkCorrector,
    options: &'a RepairOptions,
}

impl<'a> Scanner<'a> {
    /// Create a scanner
    pub fn new(corrector: &'a LinkCorrector, options: &'a RepairOptions) -> Self {
        Self { corrector, options }
    }

    /// Correct the text fields of `item`
    ///
    /// Returns `None` when no field changed. Counters are added to `metrics`.
    pub fn scan_item<R>(
        &self,
        resolver: &R,
        item: &Item,
        metrics: &mut RunMetrics,
    ) -> Option<ItemCorrections>
    where
        R: SyncResolver,
        R::Error: Display,
    {
        metrics.items_scanned += 1;
        let item_url = self.options.item_url(item.id);
        let mut records = Vec::new();

        for (field_name, value) in item.text_fields() {
            metrics.fields_scanned += 1;

            let ctx = FieldContext {
                item_id: item.id,
                field_name,
                project: self.options.project,
            };
            let correction = self.corrector.correct_field(resolver, &ctx, value);

            metrics.anchors_inspected += correction
                .outcomes
                .iter()
                .filter(|outcome| !matches!(outcome, AnchorOutcome::Foreign))
                .count();
            metrics.links_unresolved += correction.skipped();

            if !correction.is_changed() {
                continue;
            }

            metrics.links_fixed += correction.links_fixed;
            metrics.fields_corrected += 1;
            records.push(CorrectionRecord {
                item_id: item.id,
                field_name: field_name.to_string(),
                old_value: value.to_string(),
                new_value: correction.new_value,
                links_fixed: correction.links_fixed,
                document_key: item.document_key.clone(),
                lock_owner: item.lock.locked_by,
                item_url: item_url.clone(),
            });
        }

        if records.is_empty() {
            return None;
        }

        tracing::debug!(
            "{}: {} field(s) corrected",
            item.document_key,
            records.len()
        );

        Some(ItemCorrections {
            item_id: item.id,
            document_key: item.document_key.clone(),
            item_url,
            lock: item.lock,
            records,
        })
    }
}
