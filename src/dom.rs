//! Browser binding for the dropdown controller.
//!
//! Uses web_sys to find the trigger and panel, register the trigger's click
//! handler, and carry out the controller's listener commands: scheduled
//! activations go through `setTimeout(.., 0)` and the outside-click
//! subscription is a `click` listener on the window.

use std::cell::RefCell;
use std::rc::Rc;

use sitenav_ui::{
    apply_commands, Commands, DropdownController, DropdownError, DropdownOptions,
    ListenerRegistry, ListenerRuntime, PanelHost, SubscriptionId, Visibility, CLICK_EVENT,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, Node, Window};

type Listener = Closure<dyn FnMut(Event)>;

fn js_error(operation: &str, err: JsValue) -> DropdownError {
    DropdownError::dom(operation, format!("{:?}", err))
}

/// A DOM element acting as the dropdown panel.
pub struct ElementPanel {
    element: Element,
}

impl PanelHost for ElementPanel {
    type Target = Node;

    fn has_class(&self, class: &str) -> bool {
        self.element.class_list().contains(class)
    }

    fn add_class(&mut self, class: &str) -> Result<(), DropdownError> {
        self.element
            .class_list()
            .add_1(class)
            .map_err(|e| js_error("classList.add", e))
    }

    fn remove_class(&mut self, class: &str) -> Result<(), DropdownError> {
        self.element
            .class_list()
            .remove_1(class)
            .map_err(|e| js_error("classList.remove", e))
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), DropdownError> {
        self.element
            .set_attribute(name, value)
            .map_err(|e| js_error("setAttribute", e))
    }

    fn contains(&self, target: &Node) -> bool {
        self.element.contains(Some(target))
    }
}

struct Inner {
    window: Window,
    controller: DropdownController,
    panel: ElementPanel,
    /// Window click listeners, keyed by subscription
    listeners: ListenerRegistry<Listener>,
}

/// A dropdown bound to live DOM elements.
///
/// Dropping it unbinds the trigger, detaches any outside-click listener and
/// leaves the panel closed.
pub struct DomDropdown {
    inner: Rc<RefCell<Inner>>,
    trigger: Element,
    on_trigger: Option<Listener>,
}

impl DomDropdown {
    /// Look up both elements, force the panel closed and bind the trigger.
    pub fn mount(window: &Window, options: &DropdownOptions) -> Result<Self, DropdownError> {
        let document = window
            .document()
            .ok_or_else(|| DropdownError::dom("window.document", "no document"))?;
        let trigger = document
            .get_element_by_id(&options.trigger_id)
            .ok_or_else(|| DropdownError::missing_element(&options.trigger_id))?;
        let panel = document
            .get_element_by_id(&options.panel_id)
            .ok_or_else(|| DropdownError::missing_element(&options.panel_id))?;

        let inner = Rc::new(RefCell::new(Inner {
            window: window.clone(),
            controller: DropdownController::new(options.markers.clone()),
            panel: ElementPanel { element: panel },
            listeners: ListenerRegistry::new(),
        }));
        update(&inner, |controller, panel| controller.reset(panel))?;

        let weak = Rc::downgrade(&inner);
        let on_trigger = Listener::new(move |_event: Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(e) = update(&inner, |controller, panel| controller.toggle(panel)) {
                log::error!("Dropdown toggle failed: {}", e);
            }
        });
        trigger
            .add_event_listener_with_callback(CLICK_EVENT, on_trigger.as_ref().unchecked_ref())
            .map_err(|e| js_error("addEventListener", e))?;

        log::info!(
            "Dropdown mounted on #{} -> #{}",
            options.trigger_id,
            options.panel_id
        );
        Ok(Self {
            inner,
            trigger,
            on_trigger: Some(on_trigger),
        })
    }

    /// Open the panel.
    pub fn open(&self) -> Result<(), DropdownError> {
        self.ensure_mounted()?;
        update(&self.inner, |controller, panel| controller.open(panel))
    }

    /// Close the panel.
    pub fn close(&self) -> Result<(), DropdownError> {
        self.ensure_mounted()?;
        update(&self.inner, |controller, panel| controller.close(panel))
    }

    /// Toggle the panel as a trigger click would.
    pub fn toggle(&self) -> Result<(), DropdownError> {
        self.ensure_mounted()?;
        update(&self.inner, |controller, panel| controller.toggle(panel))
    }

    /// Current visibility of the panel.
    pub fn visibility(&self) -> Visibility {
        let inner = self.inner.borrow();
        inner.controller.visibility(&inner.panel)
    }

    /// Unbind everything. Later calls are no-ops.
    pub fn unmount(&mut self) -> Result<(), DropdownError> {
        let Some(on_trigger) = self.on_trigger.take() else {
            return Ok(());
        };
        self.trigger
            .remove_event_listener_with_callback(CLICK_EVENT, on_trigger.as_ref().unchecked_ref())
            .map_err(|e| js_error("removeEventListener", e))?;
        update(&self.inner, |controller, panel| controller.reset(panel))?;
        log::info!("Dropdown unmounted");
        Ok(())
    }

    fn ensure_mounted(&self) -> Result<(), DropdownError> {
        if self.on_trigger.is_some() {
            Ok(())
        } else {
            Err(DropdownError::NotMounted)
        }
    }
}

impl Drop for DomDropdown {
    fn drop(&mut self) {
        if let Err(e) = self.unmount() {
            log::warn!("Dropdown unmount on drop failed: {}", e);
        }
    }
}

/// Run a controller operation, then carry out its commands with the borrow released.
fn update<F>(inner: &Rc<RefCell<Inner>>, f: F) -> Result<(), DropdownError>
where
    F: FnOnce(&mut DropdownController, &mut ElementPanel) -> Result<Commands, DropdownError>,
{
    let commands = {
        let mut guard = inner
            .try_borrow_mut()
            .map_err(|_| DropdownError::dom("update", "dropdown is already being updated"))?;
        let Inner {
            controller, panel, ..
        } = &mut *guard;
        f(controller, panel)?
    };
    apply(inner, commands)
}

fn apply(inner: &Rc<RefCell<Inner>>, commands: Commands) -> Result<(), DropdownError> {
    apply_commands(&mut DomRuntime { inner }, commands)
}

/// `setTimeout` for scheduled activations, window `click` listeners for subscriptions.
struct DomRuntime<'a> {
    inner: &'a Rc<RefCell<Inner>>,
}

impl ListenerRuntime for DomRuntime<'_> {
    fn schedule(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
        let weak = Rc::downgrade(self.inner);
        let task = Closure::once_into_js(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let command = match inner.try_borrow_mut() {
                Ok(mut guard) => guard.controller.activate(id),
                Err(_) => {
                    log::error!("Dropdown busy, activation {} dropped", id.get());
                    return;
                }
            };
            if let Some(command) = command {
                if let Err(e) = apply(&inner, vec![command]) {
                    log::error!("Failed to attach outside-click listener: {}", e);
                }
            }
        });

        let window = self.inner.borrow().window.clone();
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                task.unchecked_ref::<js_sys::Function>(),
                0,
            )
            .map_err(|e| js_error("setTimeout", e))?;
        Ok(())
    }

    fn attach(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
        let weak = Rc::downgrade(self.inner);
        let listener = Listener::new(move |event: Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let result = update(&inner, |controller, panel| {
                controller.handle_document_click(panel, id, target.as_ref())
            });
            if let Err(e) = result {
                log::error!("Outside-click handling failed: {}", e);
            }
        });

        let mut guard = self.inner.borrow_mut();
        guard
            .window
            .add_event_listener_with_callback(CLICK_EVENT, listener.as_ref().unchecked_ref())
            .map_err(|e| js_error("addEventListener", e))?;
        guard.listeners.insert(id, listener);
        Ok(())
    }

    fn detach(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
        let mut guard = self.inner.borrow_mut();
        let Inner {
            window, listeners, ..
        } = &mut *guard;
        let Some(listener) = listeners.retire(id) else {
            return Ok(());
        };
        window
            .remove_event_listener_with_callback(CLICK_EVENT, listener.as_ref().unchecked_ref())
            .map_err(|e| js_error("removeEventListener", e))
    }
}
