//! Linkfix CLI library.
//!
//! Configuration loading, credential prompting, logging setup and output
//! formatting for the `linkfix` command-line tool.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod session;

pub use cli::Cli;
pub use config::{ConfigFile, RunConfig};
pub use error::{CliError, Result};
pub use output::Formatter;
