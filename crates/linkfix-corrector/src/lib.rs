//! Linkfix Corrector
//!
//! Finds item links in rich-text field values and repairs the ones that
//! still point at an item in another project although a synced counterpart
//! exists in the current project.
//!
//! # Overview
//!
//! For every distinct `<a>` element of a field value the corrector:
//!
//! 1. ignores links that do not point into the configured instance
//! 2. reads the linked project and item from the href
//! 3. for links into another project, asks a [`SyncResolver`] for the one
//!    counterpart in the current project (none or several: skipped)
//! 4. rewrites the href (`link_mode`) and/or relabels the link with the
//!    target's display attribute (`text_mode`)
//!
//! Anchors are rewritten in place on the raw markup: only the href value and
//! the inner content of a corrected anchor change.
//!
//! # Example Usage
//!
//! ```
//! use linkfix_corrector::{CorrectorConfig, FieldContext, LinkCorrector, RepositoryResolver};
//! use linkfix_domain::{Item, ItemId, ProjectId};
//! use linkfix_sdk::MockRepository;
//!
//! let mut repo = MockRepository::new();
//! let original = Item::new(ItemId::new(100), ProjectId::new(5), "OLD-100");
//! let copy = Item::new(ItemId::new(200), ProjectId::new(7), "NEW-100");
//! repo.add_item(original.clone());
//! repo.add_item(copy.clone());
//! repo.link_synced(&original, &copy);
//!
//! let corrector = LinkCorrector::new(CorrectorConfig::new("h"));
//! let resolver = RepositoryResolver::new(&repo);
//! let ctx = FieldContext {
//!     item_id: ItemId::new(300),
//!     field_name: "description",
//!     project: ProjectId::new(7),
//! };
//!
//! let result = corrector.correct_field(
//!     &resolver,
//!     &ctx,
//!     r#"<a href="https://h/path?projectId=5&docId=100">Old</a>"#,
//! );
//! assert_eq!(
//!     result.new_value,
//!     r#"<a href="https://h/path?projectId=7&docId=200">NEW-100</a>"#
//! );
//! assert_eq!(result.links_fixed, 1);
//! ```
//!
//! [`SyncResolver`]: linkfix_domain::SyncResolver

#![warn(missing_docs)]

pub mod anchor;
mod config;
mod corrector;
mod error;
pub mod link;
mod resolver;
mod types;


pub use config::{CorrectorConfig, DEFAULT_DISPLAY_ATTRIBUTE};
pub use corrector::LinkCorrector;
pub use error::CorrectorError;
pub use resolver::RepositoryResolver;
pub use types::{AnchorOutcome, FieldContext, FieldCorrection};
