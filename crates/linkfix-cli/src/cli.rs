//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Linkfix - repair item links that still point into the project they were
/// synced from.
#[derive(Debug, Parser)]
#[command(name = "linkfix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ./config.toml, then ~/.linkfix/config.toml)
    #[arg(short, long, env = "LINKFIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Instance URL, e.g. https://acme.jamacloud.com or just "acme"
    #[arg(long, env = "LINKFIX_INSTANCE_URL")]
    pub instance_url: Option<String>,

    /// Username (basic auth) or client id (OAuth)
    #[arg(short, long, env = "LINKFIX_USERNAME")]
    pub username: Option<String>,

    /// Password (basic auth) or client secret (OAuth)
    #[arg(long, env = "LINKFIX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Authenticate with the OAuth client-credentials grant
    #[arg(long, value_name = "BOOL", env = "LINKFIX_USING_OAUTH")]
    pub using_oauth: Option<bool>,

    /// Project whose items are repaired
    #[arg(short, long, env = "LINKFIX_PROJECT_ID")]
    pub project: Option<u64>,

    /// Retarget stale links to the synced item
    #[arg(long, value_name = "BOOL")]
    pub link_mode: Option<bool>,

    /// Relabel link text with the target's display attribute
    #[arg(long, value_name = "BOOL")]
    pub text_mode: Option<bool>,

    /// Item attribute used as link text
    #[arg(long)]
    pub display_attribute: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Log the patches that would be sent without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Path of the locked-items CSV report
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::parse_from(["linkfix"]);
        assert!(cli.project.is_none());
        assert!(!cli.dry_run);
        assert!(cli.link_mode.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "linkfix",
            "--project",
            "42",
            "--text-mode",
            "false",
            "--display-attribute",
            "name",
            "--dry-run",
            "--report",
            "out.csv",
        ]);
        assert_eq!(cli.project, Some(42));
        assert_eq!(cli.text_mode, Some(false));
        assert_eq!(cli.display_attribute.as_deref(), Some("name"));
        assert!(cli.dry_run);
        assert_eq!(cli.report, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_invalid_project_is_rejected() {
        assert!(Cli::try_parse_from(["linkfix", "--project", "abc"]).is_err());
    }
}
