//! sitenav - Site navigation dropdown
//!
//! Binds the header's dropdown button to its menu panel in the browser. The
//! behaviour lives in `sitenav_ui`; this crate adds configuration and the
//! web_sys binding.

pub mod binding;
pub mod config;

pub use binding::{BindingHandle, BindingSlot};
pub use config::{ConfigError, LogLevel, SiteNavConfig, CONFIG_VERSION};
pub use sitenav_ui::{DropdownError, DropdownOptions, PanelMarkers, Visibility};

#[cfg(target_arch = "wasm32")]
mod dom;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomDropdown, ElementPanel};

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
