//! Error types for repair runs

use linkfix_domain::ProjectId;
use thiserror::Error;

/// Errors that abort a repair run
///
/// Per-anchor and per-item problems are logged and never surface here.
#[derive(Error, Debug)]
pub enum RepairError {
    /// The configured project does not exist or is not visible
    #[error("Invalid project id [{0}]: project not found on the instance")]
    InvalidProject(ProjectId),

    /// Repository read failed before any correction could be made
    #[error("Repository error: {0}")]
    Repository(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
