//! Focus handling across one overlay lifecycle.
//!
//! On open the manager remembers what had focus and moves focus into the
//! overlay. On close it hands back a [`PendingRestore`] that returns focus
//! once the overlay has been torn down. Every lookup failure degrades to
//! leaving focus where it is.

use std::time::{Duration, Instant};

use log::debug;
use surface::{
    Element, Key, Modifiers, Surface, TabDirection, cycle_tabbable, find_element, first_tabbable,
};

use crate::confirm::OverlayAction;

/// The element that held focus right before an overlay opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusSnapshot {
    element: Option<String>,
}

impl FocusSnapshot {
    /// Record the surface's current focus.
    pub fn capture(surface: &Surface) -> Self {
        Self {
            element: surface.focused().map(str::to_string),
        }
    }

    pub fn of(element: Option<String>) -> Self {
        Self { element }
    }

    pub fn element(&self) -> Option<&str> {
        self.element.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.element.is_none()
    }
}

/// What a key press means for the overlay holding focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapAction {
    /// Escape on a dismissible overlay.
    Dismiss,
    /// Focus moved within the overlay.
    Moved(String),
    /// Enter or Space on an element tagged with an action.
    Activate(OverlayAction),
    /// The key is not the trap's business.
    Ignored,
}

/// Focus state bound to one open overlay.
#[derive(Debug)]
pub struct FocusManager {
    snapshot: FocusSnapshot,
}

impl FocusManager {
    /// Snapshot the current focus, then move focus into `content`.
    pub fn on_open(surface: &mut Surface, content: &Element, initial_focus: Option<&str>) -> Self {
        let snapshot = FocusSnapshot::capture(surface);
        Self::with_snapshot(snapshot, surface, content, initial_focus)
    }

    /// Like [`FocusManager::on_open`] but keeps an earlier snapshot, used
    /// when an overlay replaces another of the same kind.
    pub fn with_snapshot(
        snapshot: FocusSnapshot,
        surface: &mut Surface,
        content: &Element,
        initial_focus: Option<&str>,
    ) -> Self {
        debug!("[focus] snapshot {:?}", snapshot.element());
        move_focus_into(surface, content, initial_focus);
        Self { snapshot }
    }

    /// Keep `snapshot` without moving focus, for an overlay opened beneath
    /// one that holds focus.
    pub fn behind(snapshot: FocusSnapshot) -> Self {
        debug!("[focus] snapshot {:?}, focus stays on the overlay above", snapshot.element());
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &FocusSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> FocusSnapshot {
        self.snapshot
    }

    /// Handle a key press while this overlay is on top.
    ///
    /// Escape dismisses unless `locked`. Tab and Shift+Tab wrap around the
    /// overlay's tabbable elements. Enter and Space activate tagged elements.
    pub fn handle_key(
        &self,
        surface: &mut Surface,
        content: &Element,
        key: Key,
        modifiers: Modifiers,
        locked: bool,
    ) -> TrapAction {
        match key {
            Key::Escape if locked => {
                debug!("[focus] escape suppressed, overlay {} is locked", content.id);
                TrapAction::Ignored
            }
            Key::Escape => TrapAction::Dismiss,
            Key::Tab | Key::BackTab => {
                let direction = if key == Key::BackTab || modifiers.shift {
                    TabDirection::Backward
                } else {
                    TabDirection::Forward
                };
                let current = surface.focused().map(str::to_string);
                let Some(next) = cycle_tabbable(content, current.as_deref(), direction) else {
                    return TrapAction::Ignored;
                };
                match surface.focus(&next) {
                    Ok(_) => TrapAction::Moved(next),
                    Err(e) => {
                        debug!("[focus] tab target unavailable: {e}");
                        TrapAction::Ignored
                    }
                }
            }
            Key::Enter | Key::Char(' ') => surface
                .focused()
                .and_then(|id| find_element(content, id))
                .and_then(OverlayAction::of)
                .map_or(TrapAction::Ignored, TrapAction::Activate),
            _ => TrapAction::Ignored,
        }
    }

    /// Schedule focus restoration `settle` after `now`.
    ///
    /// `final_focus` overrides the snapshot as the restoration target.
    pub fn on_close(self, now: Instant, settle: Duration, final_focus: Option<String>) -> PendingRestore {
        let target = final_focus.or(self.snapshot.element);
        debug!("[focus] restore to {:?} in {:?}", target, settle);
        PendingRestore {
            target,
            deadline: now + settle,
        }
    }
}

/// Move focus to `initial_focus` or the first tabbable element of `content`.
fn move_focus_into(surface: &mut Surface, content: &Element, initial_focus: Option<&str>) {
    if let Some(id) = initial_focus {
        match surface.focus(id) {
            Ok(_) => return,
            Err(e) => debug!("[focus] initial focus target skipped: {e}"),
        }
    }

    let Some(target) = first_tabbable(content).map(|el| el.id.clone()) else {
        debug!("[focus] nothing focusable in {}, focus unmoved", content.id);
        return;
    };
    if let Err(e) = surface.focus(&target) {
        // Content that is not mounted yet, or was swapped out meanwhile
        debug!("[focus] could not focus {target}: {e}");
    }
}

/// A focus restoration waiting for the overlay's teardown to settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRestore {
    target: Option<String>,
    deadline: Instant,
}

impl PendingRestore {
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn into_target(self) -> Option<String> {
        self.target
    }

    /// Focus the target if it is still attached and focusable.
    /// Returns true if focus landed on it.
    pub fn restore(self, surface: &mut Surface) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        match surface.focus(&target) {
            Ok(_) => {
                debug!("[focus] restored to {target}");
                true
            }
            Err(e) => {
                debug!("[focus] restore skipped: {e}");
                false
            }
        }
    }
}
