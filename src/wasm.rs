use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::binding::{BindingHandle, BindingSlot};
use crate::config::{LogLevel, SiteNavConfig};
use crate::dom::DomDropdown;
use sitenav_ui::{DropdownError, LOAD_EVENT};

thread_local! {
    /// The page's one dropdown, bound on load or from script.
    static BINDING: RefCell<BindingSlot<DomDropdown>> = const { RefCell::new(BindingSlot::new()) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = SiteNavConfig::default();
    init_logging(config.log_level);

    if let Err(e) = mount_on_load(config) {
        log::error!("Failed to schedule dropdown mount: {}", e);
    }
}

fn init_logging(level: LogLevel) {
    // Only the first call installs the logger; later ones just adjust the level.
    if console_log::init_with_level(level.to_level()).is_err() {
        log::set_max_level(level.to_level_filter());
    }
}

fn window() -> Result<web_sys::Window, DropdownError> {
    web_sys::window().ok_or_else(|| DropdownError::dom("window", "no global window"))
}

/// Mount once the page has loaded. The module usually finishes
/// instantiating after `load` has already fired, in which case it mounts now.
fn mount_on_load(config: SiteNavConfig) -> Result<(), DropdownError> {
    let window = window()?;
    let loaded = window
        .document()
        .is_some_and(|document| document.ready_state() == "complete");
    if loaded {
        auto_mount(&window, &config);
        return Ok(());
    }

    let target = window.clone();
    let on_load = Closure::once_into_js(move || auto_mount(&target, &config));
    window
        .add_event_listener_with_callback(LOAD_EVENT, on_load.unchecked_ref::<js_sys::Function>())
        .map_err(|e| DropdownError::dom("addEventListener", format!("{:?}", e)))
}

fn auto_mount(window: &web_sys::Window, config: &SiteNavConfig) {
    let result = BINDING.with(|slot| {
        slot.borrow_mut()
            .bind_on_load(|| DomDropdown::mount(window, &config.dropdown))
    });
    if let Err(e) = result {
        log::warn!("Site navigation dropdown not mounted: {}", e);
    }
}

fn with_dropdown<R>(
    handle: BindingHandle,
    f: impl FnOnce(&DomDropdown) -> Result<R, DropdownError>,
) -> Result<R, DropdownError> {
    BINDING.with(|slot| {
        let slot = slot.borrow();
        let dropdown = slot.get(handle).ok_or(DropdownError::NotMounted)?;
        f(dropdown)
    })
}

/// Script handle to the page's navigation dropdown.
///
/// Mounting again releases the previous binding; its handle then reports
/// `NotMounted`.
#[wasm_bindgen]
pub struct NavDropdown {
    handle: BindingHandle,
}

#[wasm_bindgen]
impl NavDropdown {
    /// Mount on the current document, replacing any existing binding.
    ///
    /// `config` is an optional JSON object; missing fields use the defaults.
    pub fn mount(config: Option<String>) -> Result<NavDropdown, JsError> {
        let config = match config {
            Some(json) => SiteNavConfig::from_json(&json)?,
            None => SiteNavConfig::default(),
        };
        init_logging(config.log_level);

        let window = window()?;
        let handle = BINDING.with(|slot| {
            slot.borrow_mut()
                .bind_from_script(|| DomDropdown::mount(&window, &config.dropdown))
        })?;
        Ok(Self { handle })
    }

    /// Open the panel.
    pub fn open(&self) -> Result<(), JsError> {
        Ok(with_dropdown(self.handle, DomDropdown::open)?)
    }

    /// Close the panel.
    pub fn close(&self) -> Result<(), JsError> {
        Ok(with_dropdown(self.handle, DomDropdown::close)?)
    }

    /// Toggle the panel.
    pub fn toggle(&self) -> Result<(), JsError> {
        Ok(with_dropdown(self.handle, DomDropdown::toggle)?)
    }

    /// Whether the panel is open.
    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        with_dropdown(self.handle, |dropdown| Ok(dropdown.visibility().is_open()))
            .unwrap_or(false)
    }

    /// Unbind the trigger and any outside-click listener, leaving the panel closed.
    pub fn unmount(&mut self) -> Result<(), JsError> {
        let released = BINDING.with(|slot| slot.borrow_mut().release(self.handle));
        match released {
            Some(mut dropdown) => Ok(dropdown.unmount()?),
            None => Ok(()),
        }
    }
}
