//! Change hook for observers of the dropdown.

use std::fmt;

use crate::Visibility;

/// Callback invoked with the new visibility after each transition.
///
/// # Example
///
/// ```
/// use sitenav_ui::{ChangeHook, Visibility};
///
/// let hook = ChangeHook::new(|state| log::debug!("panel is now {:?}", state));
/// hook.emit(Visibility::Open);
/// ```
pub struct ChangeHook {
    f: Option<Box<dyn Fn(Visibility)>>,
}

impl ChangeHook {
    /// Create a new hook from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Visibility) + 'static,
    {
        Self {
            f: Some(Box::new(f)),
        }
    }

    /// Create an empty hook.
    pub fn none() -> Self {
        Self { f: None }
    }

    /// Call the hook, if it exists.
    pub fn emit(&self, state: Visibility) {
        if let Some(ref f) = self.f {
            f(state);
        }
    }

    /// Check if the hook is set.
    pub fn is_some(&self) -> bool {
        self.f.is_some()
    }
}

impl Default for ChangeHook {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for ChangeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeHook")
            .field("set", &self.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_hook_emits() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let hook = ChangeHook::new(move |state| seen_clone.borrow_mut().push(state));

        assert!(hook.is_some());
        hook.emit(Visibility::Open);
        hook.emit(Visibility::Closed);
        assert_eq!(*seen.borrow(), vec![Visibility::Open, Visibility::Closed]);
    }

    #[test]
    fn test_empty_hook() {
        let hook = ChangeHook::default();
        assert!(!hook.is_some());
        hook.emit(Visibility::Open);
        assert_eq!(format!("{:?}", hook), "ChangeHook { set: false }");
    }
}
