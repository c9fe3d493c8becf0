//! The page's single dropdown binding.
//!
//! Both the page-load hook and script calls to `NavDropdown.mount` go through
//! one [`BindingSlot`], so the trigger never carries two handlers. A script
//! mount claims the page: it releases whatever is bound, and any page-load
//! mount still waiting for `load` is skipped. Each script mount gets a fresh
//! [`BindingHandle`]; a later mount releases the earlier binding and the old
//! handle stops resolving.

use log::{debug, info};

/// Identifies one script mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingHandle(u64);

#[derive(Debug)]
enum Owner {
    PageLoad,
    Script(BindingHandle),
}

/// Holds at most one bound dropdown.
#[derive(Debug)]
pub struct BindingSlot<T> {
    bound: Option<(Owner, T)>,
    claimed: bool,
    next_handle: u64,
}

impl<T> Default for BindingSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BindingSlot<T> {
    /// Create an empty, unclaimed slot.
    pub const fn new() -> Self {
        Self {
            bound: None,
            claimed: false,
            next_handle: 0,
        }
    }

    /// Bind from the page-load hook.
    ///
    /// Returns `Ok(false)` without calling `bind` if a script has claimed the
    /// page or something is already bound.
    pub fn bind_on_load<E>(&mut self, bind: impl FnOnce() -> Result<T, E>) -> Result<bool, E> {
        if self.claimed || self.bound.is_some() {
            debug!("Page-load mount skipped, dropdown already bound by script");
            return Ok(false);
        }
        self.bound = Some((Owner::PageLoad, bind()?));
        Ok(true)
    }

    /// Bind from script, releasing the current binding first.
    ///
    /// The page stays claimed even if `bind` fails, so a pending page-load
    /// mount cannot bind behind the script's back.
    pub fn bind_from_script<E>(
        &mut self,
        bind: impl FnOnce() -> Result<T, E>,
    ) -> Result<BindingHandle, E> {
        self.claimed = true;
        if let Some((owner, previous)) = self.bound.take() {
            info!("Releasing dropdown bound by {:?}", owner);
            drop(previous);
        }

        self.next_handle += 1;
        let handle = BindingHandle(self.next_handle);
        self.bound = Some((Owner::Script(handle), bind()?));
        Ok(handle)
    }

    /// The binding `handle` refers to, if it is still the current one.
    pub fn get(&self, handle: BindingHandle) -> Option<&T> {
        match &self.bound {
            Some((Owner::Script(current), bound)) if *current == handle => Some(bound),
            _ => None,
        }
    }

    /// Remove the binding `handle` refers to. The page stays claimed.
    pub fn release(&mut self, handle: BindingHandle) -> Option<T> {
        self.get(handle)?;
        self.bound.take().map(|(_, bound)| bound)
    }

    /// Check if anything is bound.
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts live bindings the way trigger handlers would stack up.
    struct Bound {
        live: Rc<Cell<usize>>,
    }

    impl Bound {
        fn new(live: &Rc<Cell<usize>>) -> Result<Self, String> {
            live.set(live.get() + 1);
            Ok(Self {
                live: Rc::clone(live),
            })
        }
    }

    impl Drop for Bound {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    #[test]
    fn test_page_load_binds_when_unclaimed() {
        let live = Rc::new(Cell::new(0));
        let mut slot = BindingSlot::new();
        assert_eq!(slot.bind_on_load(|| Bound::new(&live)), Ok(true));
        assert!(slot.is_bound());
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn test_script_mount_before_load_blocks_page_load() {
        let live = Rc::new(Cell::new(0));
        let mut slot = BindingSlot::new();

        let handle = slot.bind_from_script(|| Bound::new(&live)).unwrap();
        let mut load_ran = false;
        let bound = slot.bind_on_load(|| {
            load_ran = true;
            Bound::new(&live)
        });

        assert_eq!(bound, Ok(false));
        assert!(!load_ran);
        assert_eq!(live.get(), 1);
        assert!(slot.get(handle).is_some());
    }

    #[test]
    fn test_script_mount_after_load_replaces_it() {
        let live = Rc::new(Cell::new(0));
        let mut slot = BindingSlot::new();
        slot.bind_on_load(|| Bound::new(&live)).unwrap();

        let handle = slot.bind_from_script(|| Bound::new(&live)).unwrap();
        assert_eq!(live.get(), 1);
        assert!(slot.get(handle).is_some());
    }

    #[test]
    fn test_second_script_mount_releases_first() {
        let live = Rc::new(Cell::new(0));
        let mut slot = BindingSlot::new();

        let first = slot.bind_from_script(|| Bound::new(&live)).unwrap();
        let second = slot
            .bind_from_script(|| {
                // The earlier binding is gone before the new one is made.
                assert_eq!(live.get(), 0);
                Bound::new(&live)
            })
            .unwrap();

        assert_eq!(live.get(), 1);
        assert!(slot.get(first).is_none());
        assert!(slot.get(second).is_some());
        assert!(slot.release(first).is_none());
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn test_release_keeps_page_claimed() {
        let live = Rc::new(Cell::new(0));
        let mut slot = BindingSlot::new();

        let handle = slot.bind_from_script(|| Bound::new(&live)).unwrap();
        drop(slot.release(handle));
        assert_eq!(live.get(), 0);
        assert!(!slot.is_bound());

        assert_eq!(slot.bind_on_load(|| Bound::new(&live)), Ok(false));
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_failed_script_mount_still_claims() {
        let live = Rc::new(Cell::new(0));
        let mut slot: BindingSlot<Bound> = BindingSlot::new();

        let result = slot.bind_from_script(|| Err("missing #dropdown-btn".to_string()));
        assert!(result.is_err());
        assert_eq!(slot.bind_on_load(|| Bound::new(&live)), Ok(false));
        assert!(!slot.is_bound());
    }
}
