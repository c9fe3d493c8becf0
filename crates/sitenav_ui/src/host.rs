//! The panel surface a controller reads and writes.

use crate::DropdownError;

/// Access to the panel element in whatever document hosts it.
///
/// The browser implementation wraps a `web_sys::Element`; the headless page
/// implements it over its in-memory node tree.
pub trait PanelHost {
    /// Event target type used for containment checks.
    type Target;

    /// Check if the panel currently carries `class`.
    fn has_class(&self, class: &str) -> bool;

    /// Add `class` to the panel (no-op if present).
    fn add_class(&mut self, class: &str) -> Result<(), DropdownError>;

    /// Remove `class` from the panel (no-op if absent).
    fn remove_class(&mut self, class: &str) -> Result<(), DropdownError>;

    /// Read an attribute value.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set an attribute value.
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), DropdownError>;

    /// Check if `target` is the panel or one of its descendants.
    fn contains(&self, target: &Self::Target) -> bool;
}
