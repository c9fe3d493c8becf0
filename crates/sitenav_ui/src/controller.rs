//! Dropdown controller: open/close transitions and the outside-click subscription.
//!
//! The controller never touches event registration itself. Each operation
//! writes the panel markers through a [`PanelHost`] and returns the
//! [`ListenerCommand`]s the driver must carry out:
//!
//! - `Schedule(id)`: call [`DropdownController::activate`] with `id` on the
//!   next scheduling turn, after the current click has finished dispatching
//! - `Attach(id)`: start delivering document-wide clicks for `id`
//! - `Detach(id)`: stop delivering clicks for `id`
//!
//! At most one subscription exists at a time. Opening cancels the previous
//! one before creating a new one, and closing by any path cancels it, so
//! repeated toggling never accumulates listeners. A scheduled activation that
//! was cancelled before its turn is ignored when it runs.

use crate::state::SubscriptionIds;
use crate::{
    ChangeHook, DropdownError, ListenerSlot, PanelHost, PanelMarkers, SubscriptionId, Visibility,
};

/// Listener work requested by a controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerCommand {
    /// Run `activate(id)` on the next scheduling turn
    Schedule(SubscriptionId),
    /// Attach the document click listener for `id`
    Attach(SubscriptionId),
    /// Detach the document click listener for `id`
    Detach(SubscriptionId),
}

/// Commands produced by one operation, in the order they must be applied.
pub type Commands = Vec<ListenerCommand>;

/// Drives one trigger/panel pair.
#[derive(Debug, Default)]
pub struct DropdownController {
    markers: PanelMarkers,
    listener: ListenerSlot,
    ids: SubscriptionIds,
    on_change: ChangeHook,
}

impl DropdownController {
    /// Create a controller writing the given markers.
    pub fn new(markers: PanelMarkers) -> Self {
        Self {
            markers,
            ..Self::default()
        }
    }

    /// Set the hook called after every open/close transition.
    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Visibility) + 'static,
    {
        self.on_change = ChangeHook::new(f);
        self
    }

    /// Markers this controller writes.
    pub fn markers(&self) -> &PanelMarkers {
        &self.markers
    }

    /// Current state of the outside-click subscription.
    pub fn listener(&self) -> ListenerSlot {
        self.listener
    }

    /// Visibility as recorded on the panel (presence of the open class).
    pub fn visibility<H: PanelHost>(&self, host: &H) -> Visibility {
        Visibility::from_open(host.has_class(&self.markers.open_class))
    }

    /// Check that the open class and the expanded attribute agree.
    pub fn is_consistent<H: PanelHost>(&self, host: &H) -> bool {
        host.attribute(&self.markers.expanded_attribute)
            .and_then(|value| Visibility::from_expanded_value(&value))
            == Some(self.visibility(host))
    }

    /// Force the panel closed without notifying the change hook.
    ///
    /// Used when mounting, so the served markup cannot start the widget in a
    /// half-open state, and when unmounting.
    pub fn reset<H: PanelHost>(&mut self, host: &mut H) -> Result<Commands, DropdownError> {
        let mut commands = Commands::new();
        commands.extend(self.cancel_listener());
        host.remove_class(&self.markers.open_class)?;
        host.set_attribute(
            &self.markers.expanded_attribute,
            Visibility::Closed.expanded_value(),
        )?;
        Ok(commands)
    }

    /// Trigger activation: close if open, open if closed.
    pub fn toggle<H: PanelHost>(&mut self, host: &mut H) -> Result<Commands, DropdownError> {
        match self.visibility(host).toggled() {
            Visibility::Open => self.open(host),
            Visibility::Closed => self.close(host),
        }
    }

    /// Show the panel and schedule the outside-click subscription.
    pub fn open<H: PanelHost>(&mut self, host: &mut H) -> Result<Commands, DropdownError> {
        let mut commands = Commands::new();
        commands.extend(self.cancel_listener());

        host.add_class(&self.markers.open_class)?;
        if let Some(closed) = &self.markers.closed_class {
            host.remove_class(closed)?;
        }
        host.set_attribute(
            &self.markers.expanded_attribute,
            Visibility::Open.expanded_value(),
        )?;

        let id = self.ids.next();
        self.listener = ListenerSlot::Scheduled(id);
        commands.push(ListenerCommand::Schedule(id));

        log::debug!("Dropdown opened, subscription {} scheduled", id.get());
        self.on_change.emit(Visibility::Open);
        Ok(commands)
    }

    /// Hide the panel and cancel the outside-click subscription.
    pub fn close<H: PanelHost>(&mut self, host: &mut H) -> Result<Commands, DropdownError> {
        let mut commands = Commands::new();
        commands.extend(self.cancel_listener());

        host.remove_class(&self.markers.open_class)?;
        if let Some(closed) = &self.markers.closed_class {
            host.add_class(closed)?;
        }
        host.set_attribute(
            &self.markers.expanded_attribute,
            Visibility::Closed.expanded_value(),
        )?;

        log::debug!("Dropdown closed");
        self.on_change.emit(Visibility::Closed);
        Ok(commands)
    }

    /// Run a scheduled activation.
    ///
    /// Returns `Attach(id)` if `id` is still the scheduled subscription, and
    /// `None` if it was cancelled in the meantime.
    pub fn activate(&mut self, id: SubscriptionId) -> Option<ListenerCommand> {
        if self.listener == ListenerSlot::Scheduled(id) {
            self.listener = ListenerSlot::Active(id);
            log::trace!("Subscription {} attached", id.get());
            Some(ListenerCommand::Attach(id))
        } else {
            log::trace!("Ignoring stale activation of subscription {}", id.get());
            None
        }
    }

    /// Handle a document-wide click delivered to subscription `id`.
    ///
    /// A click on the panel or inside it does nothing. Any other target
    /// closes the panel, which also detaches the subscription. `None` stands
    /// for a target that is not part of the document tree and counts as
    /// outside.
    pub fn handle_document_click<H: PanelHost>(
        &mut self,
        host: &mut H,
        id: SubscriptionId,
        target: Option<&H::Target>,
    ) -> Result<Commands, DropdownError> {
        if !self.listener.is_active_id(id) {
            log::trace!("Click for inactive subscription {} ignored", id.get());
            return Ok(Commands::new());
        }

        let inside = target.is_some_and(|target| host.contains(target));
        if inside {
            return Ok(Commands::new());
        }

        log::debug!("Click outside dropdown panel");
        self.close(host)
    }

    fn cancel_listener(&mut self) -> Option<ListenerCommand> {
        let previous = std::mem::take(&mut self.listener);
        match previous {
            ListenerSlot::Active(id) => Some(ListenerCommand::Detach(id)),
            // Never attached; its activation will find the slot changed.
            ListenerSlot::Scheduled(_) | ListenerSlot::Idle => None,
        }
    }
}
