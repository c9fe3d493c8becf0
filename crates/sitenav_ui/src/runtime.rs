//! Carrying out listener commands.
//!
//! Both drivers (the browser binding and [`crate::headless`]) implement
//! [`ListenerRuntime`] and hand the controller's output to
//! [`apply_commands`]; attached listeners are tracked in a
//! [`ListenerRegistry`].

use std::collections::BTreeMap;

use crate::{Commands, DropdownError, ListenerCommand, SubscriptionId};

/// Event-loop operations a driver provides.
pub trait ListenerRuntime {
    /// Arrange for `activate(id)` to run on the next scheduling turn.
    fn schedule(&mut self, id: SubscriptionId) -> Result<(), DropdownError>;

    /// Start delivering document clicks for `id`.
    fn attach(&mut self, id: SubscriptionId) -> Result<(), DropdownError>;

    /// Stop delivering document clicks for `id`. Unknown ids are a no-op.
    fn detach(&mut self, id: SubscriptionId) -> Result<(), DropdownError>;
}

/// Apply `commands` in order, stopping at the first failure.
pub fn apply_commands<R>(runtime: &mut R, commands: Commands) -> Result<(), DropdownError>
where
    R: ListenerRuntime + ?Sized,
{
    for command in commands {
        match command {
            ListenerCommand::Schedule(id) => runtime.schedule(id)?,
            ListenerCommand::Attach(id) => runtime.attach(id)?,
            ListenerCommand::Detach(id) => runtime.detach(id)?,
        }
    }
    Ok(())
}

/// Attached listeners keyed by subscription.
///
/// A detach usually runs inside the detached listener's own call, so the
/// listener is parked in a retired list and only dropped by the next
/// [`insert`](Self::insert), which always runs from a scheduled task.
#[derive(Debug)]
pub struct ListenerRegistry<L> {
    attached: BTreeMap<SubscriptionId, L>,
    retired: Vec<L>,
}

impl<L> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> ListenerRegistry<L> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            attached: BTreeMap::new(),
            retired: Vec::new(),
        }
    }

    /// Record the listener attached for `id`, dropping retired listeners first.
    pub fn insert(&mut self, id: SubscriptionId, listener: L) {
        self.retired.clear();
        self.attached.insert(id, listener);
    }

    /// Retire the listener for `id` and return it so the host can unregister it.
    pub fn retire(&mut self, id: SubscriptionId) -> Option<&L> {
        let listener = self.attached.remove(&id)?;
        self.retired.push(listener);
        self.retired.last()
    }

    /// Check if `id` has an attached listener.
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.attached.contains_key(&id)
    }

    /// Ids of attached listeners in subscription order.
    pub fn ids(&self) -> Vec<SubscriptionId> {
        self.attached.keys().copied().collect()
    }

    /// Number of attached listeners.
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    /// Check if no listener is attached.
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Number of detached listeners not yet dropped.
    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SubscriptionIds;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<ListenerCommand>,
        fail_attach: bool,
    }

    impl ListenerRuntime for Recorder {
        fn schedule(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
            self.calls.push(ListenerCommand::Schedule(id));
            Ok(())
        }

        fn attach(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
            if self.fail_attach {
                return Err(DropdownError::dom("addEventListener", "refused"));
            }
            self.calls.push(ListenerCommand::Attach(id));
            Ok(())
        }

        fn detach(&mut self, id: SubscriptionId) -> Result<(), DropdownError> {
            self.calls.push(ListenerCommand::Detach(id));
            Ok(())
        }
    }

    #[test]
    fn test_apply_commands_in_order() {
        let mut ids = SubscriptionIds::default();
        let (a, b) = (ids.next(), ids.next());
        let commands = vec![
            ListenerCommand::Detach(a),
            ListenerCommand::Schedule(b),
            ListenerCommand::Attach(b),
        ];

        let mut runtime = Recorder::default();
        apply_commands(&mut runtime, commands.clone()).unwrap();
        assert_eq!(runtime.calls, commands);
    }

    #[test]
    fn test_apply_commands_stops_on_error() {
        let mut ids = SubscriptionIds::default();
        let (a, b) = (ids.next(), ids.next());
        let mut runtime = Recorder {
            fail_attach: true,
            ..Recorder::default()
        };

        let result = apply_commands(
            &mut runtime,
            vec![ListenerCommand::Attach(a), ListenerCommand::Detach(b)],
        );
        assert!(result.is_err());
        assert!(runtime.calls.is_empty());
    }

    #[test]
    fn test_registry_retires_until_next_insert() {
        let mut ids = SubscriptionIds::default();
        let (first, second) = (ids.next(), ids.next());
        let mut registry = ListenerRegistry::new();

        registry.insert(first, "first");
        assert!(registry.contains(first));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.retire(first), Some(&"first"));
        assert!(registry.is_empty());
        assert_eq!(registry.retired_len(), 1);
        assert_eq!(registry.retire(first), None);

        registry.insert(second, "second");
        assert_eq!(registry.retired_len(), 0);
        assert_eq!(registry.ids(), vec![second]);
    }
}
