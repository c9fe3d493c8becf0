//! sitenav_ui - Dropdown behaviour for the site navigation, independent of the DOM
//!
//! A [`DropdownController`] keeps one panel's open marker and expanded
//! attribute in agreement and manages the single outside-click subscription.
//! Hosts implement [`PanelHost`]; the browser binding lives in the `sitenav`
//! crate and [`headless`] provides an in-memory page.

mod callback;
mod config;
mod constants;
mod controller;
mod error;
mod host;
mod runtime;
mod state;

pub mod headless;

pub use callback::ChangeHook;
pub use config::{DropdownOptions, PanelMarkers};
pub use constants::*;
pub use controller::{Commands, DropdownController, ListenerCommand};
pub use error::DropdownError;
pub use host::PanelHost;
pub use runtime::{apply_commands, ListenerRegistry, ListenerRuntime};
pub use state::{ListenerSlot, SubscriptionId, Visibility};
