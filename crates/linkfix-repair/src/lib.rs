//! Linkfix Repair
//!
//! Runs the link corrector over a whole project and writes the results back.
//!
//! # Overview
//!
//! A repair run:
//! - **Validates** the configured project against the projects of the instance
//! - **Scans** every text field of every item with the link corrector
//! - **Patches** each changed item once, with all of its corrected fields
//! - **Reports** items that are locked, instead of writing to them
//!
//! Nothing is retried. A link that cannot be corrected is logged and counted,
//! a failed patch leaves the item as it was.
//!
//! # Usage
//!
//! ```no_run
//! use linkfix_corrector::CorrectorConfig;
//! use linkfix_domain::ProjectId;
//! use linkfix_repair::{RepairOptions, Repairer};
//! use linkfix_sdk::{ClientOptions, Credentials, RestClient};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RestClient::new(
//!     "https://acme.jamacloud.com",
//!     Credentials::OAuth {
//!         client_id: "id".to_string(),
//!         client_secret: "secret".to_string(),
//!     },
//!     ClientOptions::default(),
//! )?;
//!
//! let options = RepairOptions::new(
//!     ProjectId::new(7),
//!     "https://acme.jamacloud.com",
//!     CorrectorConfig::new("acme.jamacloud.com"),
//! );
//! let report = Repairer::new(options)?.run(&client)?;
//!
//! println!("{}", report.metrics.summary());
//! report.lock_report.save(Path::new("locked_items.csv"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Lock Report
//!
//! Locked items end up in a CSV file with one row per document key:
//!
//! ```text
//! Document Key,Locked By,Item URL
//! REQ-12,"=HYPERLINK(""https://…/perspective.req#/items/12?projectId=7"",""Ada Lovelace"")",https://…
//! ```

#![warn(missing_docs)]

mod batcher;
mod config;
mod error;
mod lock_report;
mod metrics;
mod repair;
mod scan;

pub use batcher::{PatchBatcher, PatchOutcome};
pub use config::RepairOptions;
pub use error::RepairError;
pub use lock_report::{LockReport, OwnerDirectory, LOCK_REPORT_HEADER};
pub use metrics::RunMetrics;
pub use repair::{RepairReport, Repairer};
pub use scan::{ItemCorrections, Scanner};
