//! Configuration for the link corrector

use crate::error::CorrectorError;
use serde::{Deserialize, Serialize};

/// Attribute used to label links when none is configured
pub const DEFAULT_DISPLAY_ATTRIBUTE: &str = "documentKey";

/// Configuration for the link corrector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectorConfig {
    /// Host of the instance, e.g. `acme.example.com`; links to other hosts
    /// are never touched
    pub instance_host: String,

    /// Rewrite the href of stale links to the synced counterpart
    #[serde(default)]
    pub link_mode: bool,

    /// Relabel link text with the target's display attribute
    #[serde(default)]
    pub text_mode: bool,

    /// Item attribute used as link text in text mode
    #[serde(default = "default_display_attribute")]
    pub display_attribute: String,
}

fn default_display_attribute() -> String {
    DEFAULT_DISPLAY_ATTRIBUTE.to_string()
}

impl CorrectorConfig {
    /// Create a configuration with both modes enabled
    pub fn new(instance_host: impl Into<String>) -> Self {
        Self {
            instance_host: instance_host.into(),
            link_mode: true,
            text_mode: true,
            display_attribute: default_display_attribute(),
        }
    }

    /// Builder-style setter for the modes
    pub fn with_modes(mut self, link_mode: bool, text_mode: bool) -> Self {
        self.link_mode = link_mode;
        self.text_mode = text_mode;
        self
    }

    /// Builder-style setter for the display attribute
    pub fn with_display_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.display_attribute = attribute.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CorrectorError> {
        if self.instance_host.trim().is_empty() {
            return Err(CorrectorError::Config("instance_host must not be empty".to_string()));
        }
        if !self.link_mode && !self.text_mode {
            return Err(CorrectorError::Config(
                "at least one of link_mode and text_mode must be enabled".to_string(),
            ));
        }
        if self.display_attribute.trim().is_empty() {
            return Err(CorrectorError::Config(
                "display_attribute must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CorrectorConfig::new("acme.example.com");
        assert!(config.validate().is_ok());
        assert_eq!(config.display_attribute, "documentKey");
    }

    #[test]
    fn test_no_mode_is_invalid() {
        let config = CorrectorConfig::new("acme.example.com").with_modes(false, false);
        assert!(matches!(config.validate(), Err(CorrectorError::Config(_))));
    }

    #[test]
    fn test_empty_host_is_invalid() {
        let config = CorrectorConfig::new("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_defaults() {
        let config: CorrectorConfig =
            toml::from_str("instance_host = \"acme.example.com\"\ntext_mode = true").unwrap();
        assert!(!config.link_mode);
        assert!(config.text_mode);
        assert_eq!(config.display_attribute, DEFAULT_DISPLAY_ATTRIBUTE);
    }
}
