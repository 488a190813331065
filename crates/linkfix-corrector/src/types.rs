//! Input and output types of a field correction

use crate::error::CorrectorError;
use linkfix_domain::{ItemId, ProjectId};

/// Where a field value comes from
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Item owning the field
    pub item_id: ItemId,
    /// Field name
    pub field_name: &'a str,
    /// Project the item belongs to; links should point here
    pub project: ProjectId,
}

/// What happened to one distinct anchor of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// Not a link into the instance
    Foreign,
    /// Link already points at the right item with the right text
    Valid,
    /// Link was rewritten
    Corrected {
        /// Item the link now points at
        target: ItemId,
        /// Rewritten anchor markup
        replacement: String,
    },
    /// Link is broken but could not be corrected
    Skipped(CorrectorError),
}

/// Result of correcting one field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCorrection {
    /// Field value after all corrections
    pub new_value: String,
    /// Number of distinct anchors corrected
    pub links_fixed: usize,
    /// Outcome per distinct anchor, in document order
    pub outcomes: Vec<AnchorOutcome>,
}

impl FieldCorrection {
    /// Whether any anchor changed
    pub fn is_changed(&self) -> bool {
        self.links_fixed > 0
    }

    /// Number of anchors that looked broken but were left alone
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, AnchorOutcome::Skipped(_)))
            .count()
    }
}
