//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required settings absent from both the config file and the flags
    #[error("Missing configuration value(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Credentials rejected, also after re-entry
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// SDK error
    #[error("SDK error: {0}")]
    Sdk(#[from] linkfix_sdk::SdkError),

    /// Repair run error
    #[error(transparent)]
    Repair(#[from] linkfix_repair::RepairError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(String),

    /// Terminal prompt failed
    #[error("Prompt error: {0}")]
    Prompt(String),
}
