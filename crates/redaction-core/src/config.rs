//! Restriction panel configuration
//!
//! Loaded from a bundled TOML file or from a JSON object handed over by the
//! host page. Every field has a default, so an empty document is valid.

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// Panel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Base URL of the documents API (default: same origin)
    #[serde(default)]
    pub api_base_url: String,
    /// Smallest drag, in display pixels, accepted as a selection (default: 10)
    #[serde(default = "default_min_selection_px")]
    pub min_selection_px: f64,
    /// Shown when a restriction's collaborator is not in the collaborator list
    #[serde(default = "default_unknown_user_label")]
    pub unknown_user_label: String,
    /// Label of the live drag rectangle
    #[serde(default = "default_custom_area_label")]
    pub custom_area_label: String,
}

fn default_min_selection_px() -> f64 {
    10.0
}

fn default_unknown_user_label() -> String {
    "Unknown User".to_string()
}

fn default_custom_area_label() -> String {
    redaction_types::CUSTOM_AREA_FIELD.to_string()
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            min_selection_px: default_min_selection_px(),
            unknown_user_label: default_unknown_user_label(),
            custom_area_label: default_custom_area_label(),
        }
    }
}

impl PanelConfig {
    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range
    ///
    /// # Example
    ///
    /// ```
    /// use redaction_core::config::PanelConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = PanelConfig::from_toml_str(r#"
    ///     api_base_url = "https://docs.example.com/api"
    ///     min_selection_px = 12.0
    /// "#)?;
    /// assert_eq!(config.unknown_user_label, "Unknown User");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(s).context("Failed to parse JSON configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.min_selection_px.is_finite() && self.min_selection_px >= 0.0,
            "min_selection_px must be a non-negative number, got {}",
            self.min_selection_px
        );
        ensure!(
            !self.unknown_user_label.trim().is_empty(),
            "unknown_user_label must not be empty"
        );
        Ok(())
    }
}
