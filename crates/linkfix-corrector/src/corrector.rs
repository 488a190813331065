//! Core link corrector implementation

use crate::anchor::{escape_text, find_anchors, Anchor};
use crate::config::CorrectorConfig;
use crate::error::CorrectorError;
use crate::link::{parse_link, rewrite_href};
use crate::types::{AnchorOutcome, FieldContext, FieldCorrection};
use linkfix_domain::traits::{SyncResolution, SyncResolver};
use linkfix_domain::ItemId;
use std::collections::HashMap;
use std::fmt::Display;
use tracing::{debug, error, info};

/// The link corrector finds and repairs stale item links in a field value
pub struct LinkCorrector {
    config: CorrectorConfig,
}

impl LinkCorrector {
    /// Create a new corrector
    pub fn new(config: CorrectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    /// Correct every stale anchor of one field value
    ///
    /// Identical anchor markup is looked up once and the correction applied
    /// to all its occurrences. Failures are logged per anchor and never stop
    /// the remaining anchors.
    pub fn correct_field<R>(
        &self,
        resolver: &R,
        ctx: &FieldContext<'_>,
        html: &str,
    ) -> FieldCorrection
    where
        R: SyncResolver,
        R::Error: Display,
    {
        let anchors = find_anchors(html);
        if anchors.is_empty() {
            return FieldCorrection {
                new_value: html.to_string(),
                links_fixed: 0,
                outcomes: Vec::new(),
            };
        }

        // Distinct anchors in document order
        let mut distinct: Vec<&Anchor<'_>> = Vec::new();
        for anchor in &anchors {
            if !distinct.iter().any(|seen| seen.raw() == anchor.raw()) {
                distinct.push(anchor);
            }
        }

        info!(
            "Processing {} hyperlink(s) on item [{}] field [{}]",
            distinct.len(),
            ctx.item_id,
            ctx.field_name
        );

        let mut replacements: HashMap<&str, String> = HashMap::new();
        let mut outcomes = Vec::with_capacity(distinct.len());

        for (index, anchor) in distinct.iter().enumerate() {
            let outcome = match self.correct_anchor(resolver, ctx, anchor) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(
                        "--- link {} --- item [{}] field [{}]: {}",
                        index + 1,
                        ctx.item_id,
                        ctx.field_name,
                        e
                    );
                    AnchorOutcome::Skipped(e)
                }
            };

            if let AnchorOutcome::Corrected {
                target,
                replacement,
            } = &outcome
            {
                info!(
                    "--- link {} --- corrected to point to item [{}]",
                    index + 1,
                    target
                );
                replacements.insert(anchor.raw(), replacement.clone());
            }
            outcomes.push(outcome);
        }

        FieldCorrection {
            new_value: splice(html, &anchors, &replacements),
            links_fixed: replacements.len(),
            outcomes,
        }
    }

    fn correct_anchor<R>(
        &self,
        resolver: &R,
        ctx: &FieldContext<'_>,
        anchor: &Anchor<'_>,
    ) -> Result<AnchorOutcome, CorrectorError>
    where
        R: SyncResolver,
        R::Error: Display,
    {
        let Some(href) = anchor.href() else {
            return Ok(AnchorOutcome::Foreign);
        };
        let Some(link) = parse_link(href, &self.config.instance_host)? else {
            return Ok(AnchorOutcome::Foreign);
        };

        debug!(
            "Processing link with item [{}] and project [{}]",
            link.item, link.project
        );

        let same_project = link.project == ctx.project;
        if same_project && !self.config.text_mode {
            return Ok(AnchorOutcome::Valid);
        }

        let target = if same_project {
            link.item
        } else {
            self.resolve(resolver, link.item, ctx)?
        };

        let new_inner = if self.config.text_mode {
            let name = resolver
                .display_value(target, &self.config.display_attribute)
                .map_err(|e| CorrectorError::Resolution(e.to_string()))?
                .ok_or_else(|| CorrectorError::MissingDisplayValue {
                    item: target,
                    attribute: self.config.display_attribute.clone(),
                })?;
            let name = escape_text(&name);
            (anchor.visible_text().trim() != name).then_some(name)
        } else {
            None
        };

        let new_href = (self.config.link_mode && !same_project)
            .then(|| rewrite_href(href, &link, ctx.project, target));

        if new_inner.is_none() && new_href.is_none() {
            return Ok(AnchorOutcome::Valid);
        }

        let replacement = anchor.rewrite(new_href.as_deref(), new_inner.as_deref());
        if replacement == anchor.raw() {
            return Ok(AnchorOutcome::Valid);
        }

        Ok(AnchorOutcome::Corrected {
            target,
            replacement,
        })
    }

    fn resolve<R>(
        &self,
        resolver: &R,
        item: ItemId,
        ctx: &FieldContext<'_>,
    ) -> Result<ItemId, CorrectorError>
    where
        R: SyncResolver,
        R::Error: Display,
    {
        let resolution = resolver
            .resolve_in_project(item, ctx.project)
            .map_err(|e| CorrectorError::Resolution(e.to_string()))?;

        match resolution {
            SyncResolution::Unique(id) => Ok(id),
            SyncResolution::NotFound => Err(CorrectorError::NoSyncedItem {
                item,
                project: ctx.project,
            }),
            SyncResolution::Ambiguous(candidates) => Err(CorrectorError::AmbiguousSync {
                item,
                project: ctx.project,
                candidates: candidates.iter().map(ItemId::value).collect(),
            }),
        }
    }
}

/// Rebuild `html` with every anchor whose markup has a replacement swapped
fn splice(html: &str, anchors: &[Anchor<'_>], replacements: &HashMap<&str, String>) -> String {
    if replacements.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    for anchor in anchors {
        if let Some(replacement) = replacements.get(anchor.raw()) {
            let span = anchor.span();
            out.push_str(&html[cursor..span.start]);
            out.push_str(replacement);
            cursor = span.end;
        }
    }
    out.push_str(&html[cursor..]);
    out
}
