//! Configuration management for the CLI.
//!
//! Settings come from a TOML file and are overridden by command-line flags
//! (or their environment variables):
//!
//! ```toml
//! [credentials]
//! instance_url = "acme"
//! username = "client-id"
//! password = "client-secret"
//! using_oauth = true
//!
//! [parameters]
//! project_id = 42
//! link_mode = true
//! text_mode = true
//! display_attribute = "documentKey"
//! disable_tls_verification = false
//! dry_run = false
//! report_path = "locked_items.csv"
//! log_dir = "logs"
//! ```

use crate::cli::Cli;
use crate::error::{CliError, Result};
use linkfix_corrector::{CorrectorConfig, DEFAULT_DISPLAY_ATTRIBUTE};
use linkfix_domain::ProjectId;
use linkfix_repair::RepairOptions;
use linkfix_sdk::{ClientOptions, Credentials};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default report file name
pub const DEFAULT_REPORT_PATH: &str = "locked_items.csv";

/// Default log directory
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Domain appended to shorthand cloud instance names
const CLOUD_DOMAIN: &str = ".jamacloud.com";

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Instance and login
    #[serde(default)]
    pub credentials: CredentialsSection,

    /// What to repair and how
    #[serde(default)]
    pub parameters: ParametersSection,
}

/// `[credentials]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsSection {
    /// Instance URL or shorthand cloud name
    pub instance_url: Option<String>,

    /// Username (basic auth) or client id (OAuth)
    pub username: Option<String>,

    /// Password (basic auth) or client secret (OAuth)
    pub password: Option<String>,

    /// Authenticate with OAuth client credentials
    pub using_oauth: Option<bool>,
}

/// `[parameters]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParametersSection {
    /// Project to repair
    pub project_id: Option<u64>,

    /// Retarget stale links (default: true)
    pub link_mode: Option<bool>,

    /// Relabel link text (default: true)
    pub text_mode: Option<bool>,

    /// Item attribute used as link text
    pub display_attribute: Option<String>,

    /// Accept invalid TLS certificates
    #[serde(default)]
    pub disable_tls_verification: bool,

    /// Only log planned patches
    #[serde(default)]
    pub dry_run: bool,

    /// Locked-items report path
    pub report_path: Option<PathBuf>,

    /// Log directory
    pub log_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Configuration file in the user's home directory.
    pub fn home_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".linkfix").join("config.toml"))
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `config.toml` in the working
    /// directory is tried, then the home directory file; when neither exists
    /// every value has to come from flags.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let local = PathBuf::from("config.toml");
        if local.exists() {
            return Self::read(&local);
        }

        match Self::home_path() {
            Ok(path) if path.exists() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a configuration file.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Reading configuration from {}", path.display());
        Ok(toml::from_str(&contents)?)
    }

    /// Apply command-line flags on top of the file values.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        let credentials = &mut self.credentials;
        override_with(&mut credentials.instance_url, &cli.instance_url);
        override_with(&mut credentials.username, &cli.username);
        override_with(&mut credentials.password, &cli.password);
        override_with(&mut credentials.using_oauth, &cli.using_oauth);

        let parameters = &mut self.parameters;
        override_with(&mut parameters.project_id, &cli.project);
        override_with(&mut parameters.link_mode, &cli.link_mode);
        override_with(&mut parameters.text_mode, &cli.text_mode);
        override_with(&mut parameters.display_attribute, &cli.display_attribute);
        override_with(&mut parameters.report_path, &cli.report);
        override_with(&mut parameters.log_dir, &cli.log_dir);
        parameters.disable_tls_verification |= cli.insecure;
        parameters.dry_run |= cli.dry_run;
    }

    /// Replace the login with freshly entered values.
    pub fn set_credentials(&mut self, entered: CredentialsSection) {
        self.credentials = entered;
    }
}

fn override_with<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

/// Complete, validated settings of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Normalized instance URL, e.g. `https://acme.jamacloud.com`
    pub instance_url: String,

    /// Login
    pub credentials: Credentials,

    /// Project to repair
    pub project: ProjectId,

    /// Retarget stale links
    pub link_mode: bool,

    /// Relabel link text
    pub text_mode: bool,

    /// Item attribute used as link text
    pub display_attribute: String,

    /// Accept invalid TLS certificates
    pub accept_invalid_certs: bool,

    /// Only log planned patches
    pub dry_run: bool,

    /// Locked-items report path
    pub report_path: PathBuf,

    /// Log directory
    pub log_dir: PathBuf,
}

impl RunConfig {
    /// Validate a configuration file into run settings.
    ///
    /// All missing values are reported at once.
    pub fn from_file(file: &ConfigFile) -> Result<Self> {
        let credentials = &file.credentials;
        let parameters = &file.parameters;

        let mut missing = Vec::new();
        let instance_url = non_empty(&credentials.instance_url);
        let username = non_empty(&credentials.username);
        let password = non_empty(&credentials.password);

        if instance_url.is_none() {
            missing.push("credentials.instance_url");
        }
        if username.is_none() {
            missing.push("credentials.username");
        }
        if password.is_none() {
            missing.push("credentials.password");
        }
        if credentials.using_oauth.is_none() {
            missing.push("credentials.using_oauth");
        }
        if parameters.project_id.is_none() {
            missing.push("parameters.project_id");
        }

        let (
            Some(instance_url),
            Some(username),
            Some(password),
            Some(using_oauth),
            Some(project_id),
        ) = (
            instance_url,
            username,
            password,
            credentials.using_oauth,
            parameters.project_id,
        )
        else {
            return Err(CliError::MissingFields(missing));
        };

        let link_mode = parameters.link_mode.unwrap_or(true);
        let text_mode = parameters.text_mode.unwrap_or(true);
        if !link_mode && !text_mode {
            return Err(CliError::Config(
                "Nothing to do: enable link_mode, text_mode or both".to_string(),
            ));
        }

        let credentials = if using_oauth {
            Credentials::OAuth {
                client_id: username,
                client_secret: password,
            }
        } else {
            Credentials::Basic { username, password }
        };

        Ok(Self {
            instance_url: normalize_instance_url(&instance_url),
            credentials,
            project: ProjectId::new(project_id),
            link_mode,
            text_mode,
            display_attribute: non_empty(&parameters.display_attribute)
                .unwrap_or_else(|| DEFAULT_DISPLAY_ATTRIBUTE.to_string()),
            accept_invalid_certs: parameters.disable_tls_verification,
            dry_run: parameters.dry_run,
            report_path: parameters
                .report_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH)),
            log_dir: parameters
                .log_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        })
    }

    /// Host of the instance, used to recognise internal links.
    pub fn instance_host(&self) -> Result<String> {
        url::Url::parse(&self.instance_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| {
                CliError::Config(format!("Invalid instance URL <{}>", self.instance_url))
            })
    }

    /// Options of the repair run.
    pub fn repair_options(&self) -> Result<RepairOptions> {
        let corrector = CorrectorConfig::new(self.instance_host()?)
            .with_modes(self.link_mode, self.text_mode)
            .with_display_attribute(self.display_attribute.clone());

        Ok(
            RepairOptions::new(self.project, &self.instance_url, corrector)
                .with_dry_run(self.dry_run),
        )
    }

    /// Options of the REST client.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            accept_invalid_certs: self.accept_invalid_certs,
            ..ClientOptions::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Normalize a user-entered instance URL.
///
/// Lowercases, drops a trailing slash and assumes `https://` when no scheme
/// is given. A bare name without a dot is a cloud instance shorthand.
///
/// # Examples
///
/// ```
/// use linkfix_cli::config::normalize_instance_url;
///
/// assert_eq!(normalize_instance_url("Acme"), "https://acme.jamacloud.com");
/// assert_eq!(normalize_instance_url("jama.corp.example/"), "https://jama.corp.example");
/// assert_eq!(normalize_instance_url("http://localhost:8080"), "http://localhost:8080");
/// ```
pub fn normalize_instance_url(raw: &str) -> String {
    let url = raw.trim().to_lowercase();
    let url = url.trim_end_matches('/');

    if url.starts_with("https://") || url.starts_with("http://") {
        return url.to_string();
    }
    if url.contains('.') {
        format!("https://{}", url)
    } else {
        format!("https://{}{}", url, CLOUD_DOMAIN)
    }
}
