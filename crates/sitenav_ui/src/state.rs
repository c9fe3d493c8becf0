//! State types for the dropdown controller

use crate::constants::{EXPANDED_FALSE, EXPANDED_TRUE};

/// Whether the panel is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Panel hidden (initial state)
    #[default]
    Closed,
    /// Panel shown
    Open,
}

impl Visibility {
    /// Visibility matching a boolean "is open" flag.
    pub fn from_open(is_open: bool) -> Self {
        if is_open {
            Visibility::Open
        } else {
            Visibility::Closed
        }
    }

    /// Check if open
    pub fn is_open(&self) -> bool {
        matches!(self, Visibility::Open)
    }

    /// The opposite state
    pub fn toggled(&self) -> Self {
        match self {
            Visibility::Open => Visibility::Closed,
            Visibility::Closed => Visibility::Open,
        }
    }

    /// Value written to the expanded attribute for this state.
    pub fn expanded_value(&self) -> &'static str {
        match self {
            Visibility::Open => EXPANDED_TRUE,
            Visibility::Closed => EXPANDED_FALSE,
        }
    }

    /// Parse an expanded attribute value. Anything but `"true"` / `"false"` is `None`.
    pub fn from_expanded_value(value: &str) -> Option<Self> {
        match value {
            EXPANDED_TRUE => Some(Visibility::Open),
            EXPANDED_FALSE => Some(Visibility::Closed),
            _ => None,
        }
    }
}

/// Handle identifying one outside-click subscription.
///
/// Ids are never reused by a controller, so a handle that outlives its
/// subscription can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric value (for logging)
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Lifecycle of the single outside-click subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerSlot {
    /// No subscription
    #[default]
    Idle,
    /// Created on open, waiting for the next scheduling turn to attach
    Scheduled(SubscriptionId),
    /// Attached to the document and receiving clicks
    Active(SubscriptionId),
}

impl ListenerSlot {
    /// Id of the current subscription, scheduled or active
    pub fn id(&self) -> Option<SubscriptionId> {
        match self {
            ListenerSlot::Idle => None,
            ListenerSlot::Scheduled(id) | ListenerSlot::Active(id) => Some(*id),
        }
    }

    /// Check if `id` is the attached subscription
    pub fn is_active_id(&self, id: SubscriptionId) -> bool {
        *self == ListenerSlot::Active(id)
    }
}

/// Allocates subscription ids for one controller.
#[derive(Debug, Clone, Default)]
pub(crate) struct SubscriptionIds {
    next: u64,
}

impl SubscriptionIds {
    pub(crate) fn next(&mut self) -> SubscriptionId {
        self.next += 1;
        SubscriptionId(self.next)
    }
}
