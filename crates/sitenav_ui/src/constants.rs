//! Centralized constants for sitenav_ui
//!
//! Defaults for the markup contract the site's navigation is served with.

// =============================================================================
// Markup contract
// =============================================================================

/// Id of the trigger button in the site header
pub const DEFAULT_TRIGGER_ID: &str = "dropdown-btn";

/// Id of the navigation panel
pub const DEFAULT_PANEL_ID: &str = "dropdown-menu";

// =============================================================================
// Panel markers
// =============================================================================

/// Class that makes the panel visible
pub const DEFAULT_OPEN_CLASS: &str = "visible";

/// Accessibility attribute mirroring openness
pub const DEFAULT_EXPANDED_ATTRIBUTE: &str = "aria-expanded";

/// Attribute value while open
pub const EXPANDED_TRUE: &str = "true";

/// Attribute value while closed
pub const EXPANDED_FALSE: &str = "false";

// =============================================================================
// Events
// =============================================================================

/// Event that activates the trigger and drives outside-click detection
pub const CLICK_EVENT: &str = "click";

/// Page-ready event the auto-mount waits for
pub const LOAD_EVENT: &str = "load";
