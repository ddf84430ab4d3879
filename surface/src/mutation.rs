//! Attribute change records on the root surface.
//!
//! The surface queues a [`Mutation`] every time one of its root attributes
//! changes value while observation is enabled. Observers drain the queue and
//! inspect the surface state afterwards.

use crate::surface::PointerEvents;

/// A root attribute that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Pointer interaction flag changed to the given value.
    PointerEvents(PointerEvents),
    /// Scroll lock was applied (`true`) or released (`false`).
    ScrollLock(bool),
}

impl Mutation {
    /// Whether this change, taken alone, leaves the surface degraded.
    pub fn is_degrading(&self) -> bool {
        match self {
            Mutation::PointerEvents(value) => *value == PointerEvents::None,
            Mutation::ScrollLock(locked) => *locked,
        }
    }
}
