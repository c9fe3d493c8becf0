//! Dropdown options: element ids and the markers written to the panel.
//!
//! Every field has a serde default matching the markup the site ships with,
//! so an empty JSON object deserializes to the standard setup.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXPANDED_ATTRIBUTE, DEFAULT_OPEN_CLASS, DEFAULT_PANEL_ID, DEFAULT_TRIGGER_ID,
};

/// Class and attribute names used to mark the panel's visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMarkers {
    /// Class present on the panel while it is open
    #[serde(default = "default_open_class")]
    pub open_class: String,

    /// Extra class applied on close. Nothing in the site reads it, so it is
    /// off unless a stylesheet asks for it.
    #[serde(default)]
    pub closed_class: Option<String>,

    /// Attribute mirroring openness as `"true"` / `"false"`
    #[serde(default = "default_expanded_attribute")]
    pub expanded_attribute: String,
}

fn default_open_class() -> String {
    DEFAULT_OPEN_CLASS.to_string()
}

fn default_expanded_attribute() -> String {
    DEFAULT_EXPANDED_ATTRIBUTE.to_string()
}

impl Default for PanelMarkers {
    fn default() -> Self {
        Self {
            open_class: default_open_class(),
            closed_class: None,
            expanded_attribute: default_expanded_attribute(),
        }
    }
}

impl PanelMarkers {
    /// Set the class applied on close.
    pub fn with_closed_class(mut self, class: impl Into<String>) -> Self {
        self.closed_class = Some(class.into());
        self
    }
}

/// Where to find the dropdown in the page and how to mark it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOptions {
    /// Id of the control that toggles the panel
    #[serde(default = "default_trigger_id")]
    pub trigger_id: String,

    /// Id of the panel whose visibility is controlled
    #[serde(default = "default_panel_id")]
    pub panel_id: String,

    /// Panel markers
    #[serde(default)]
    pub markers: PanelMarkers,
}

fn default_trigger_id() -> String {
    DEFAULT_TRIGGER_ID.to_string()
}

fn default_panel_id() -> String {
    DEFAULT_PANEL_ID.to_string()
}

impl Default for DropdownOptions {
    fn default() -> Self {
        Self {
            trigger_id: default_trigger_id(),
            panel_id: default_panel_id(),
            markers: PanelMarkers::default(),
        }
    }
}

impl DropdownOptions {
    /// Options for a trigger/panel pair with default markers.
    pub fn new(trigger_id: impl Into<String>, panel_id: impl Into<String>) -> Self {
        Self {
            trigger_id: trigger_id.into(),
            panel_id: panel_id.into(),
            markers: PanelMarkers::default(),
        }
    }

    /// Replace the panel markers.
    pub fn with_markers(mut self, markers: PanelMarkers) -> Self {
        self.markers = markers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_markup() {
        let options = DropdownOptions::default();
        assert_eq!(options.trigger_id, "dropdown-btn");
        assert_eq!(options.panel_id, "dropdown-menu");
        assert_eq!(options.markers.open_class, "visible");
        assert_eq!(options.markers.expanded_attribute, "aria-expanded");
        assert!(options.markers.closed_class.is_none());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let options: DropdownOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, DropdownOptions::default());
    }

    #[test]
    fn test_partial_markers() {
        let json = r#"{ "panel_id": "nav", "markers": { "closed_class": "false" } }"#;
        let options: DropdownOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.trigger_id, "dropdown-btn");
        assert_eq!(options.panel_id, "nav");
        assert_eq!(options.markers.open_class, "visible");
        assert_eq!(options.markers.closed_class.as_deref(), Some("false"));
    }
}
