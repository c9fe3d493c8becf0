//! Configuration for the site navigation.
//!
//! The page may pass a JSON object to `NavDropdown.mount`; every field is
//! optional and falls back to the markup the site ships with.

use serde::{Deserialize, Serialize};
use sitenav_ui::DropdownOptions;
use thiserror::Error;

/// Log level setting for the browser console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's Level.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }
}

/// Current configuration format version.
pub const CONFIG_VERSION: u32 = 1;

/// Errors from parsing or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Version newer than this build understands
    #[error("Unsupported config version {found} (expected at most {expected})")]
    UnsupportedVersion {
        /// Version this build writes
        expected: u32,
        /// Version found in the input
        found: u32,
    },

    /// A field holds a value that cannot be used
    #[error("Invalid value for '{field}': {message}")]
    InvalidOption {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid option error.
    pub fn invalid_option(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Site navigation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteNavConfig {
    /// Version of the configuration format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Console log verbosity
    #[serde(default)]
    pub log_level: LogLevel,

    /// Dropdown element ids and markers
    #[serde(default)]
    pub dropdown: DropdownOptions,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for SiteNavConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            dropdown: DropdownOptions::default(),
        }
    }
}

impl SiteNavConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration can drive a dropdown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                expected: CONFIG_VERSION,
                found: self.version,
            });
        }

        let dropdown = &self.dropdown;
        require_token("dropdown.trigger_id", &dropdown.trigger_id)?;
        require_token("dropdown.panel_id", &dropdown.panel_id)?;
        if dropdown.trigger_id == dropdown.panel_id {
            return Err(ConfigError::invalid_option(
                "dropdown.panel_id",
                "must differ from trigger_id",
            ));
        }

        let markers = &dropdown.markers;
        require_token("dropdown.markers.open_class", &markers.open_class)?;
        require_token(
            "dropdown.markers.expanded_attribute",
            &markers.expanded_attribute,
        )?;
        if let Some(closed) = &markers.closed_class {
            require_token("dropdown.markers.closed_class", closed)?;
            if *closed == markers.open_class {
                return Err(ConfigError::invalid_option(
                    "dropdown.markers.closed_class",
                    "must differ from open_class",
                ));
            }
        }
        Ok(())
    }
}

/// Ids, class names and attribute names must be non-empty and whitespace-free.
fn require_token(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::invalid_option(field, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::invalid_option(
            field,
            format!("'{}' contains whitespace", value),
        ));
    }
    Ok(())
}
