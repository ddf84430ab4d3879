//! Overlay service facade.
//!
//! [`OverlayService`] is the one object feature code talks to. It owns the
//! registry, one focus manager per open overlay, the pending focus
//! restorations and the pointer guard, and it is the only thing that mounts
//! overlay content into the root surface. Create it at application start,
//! hand it to whoever opens overlays, and shut it down (or drop it) at the end.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use surface::{Element, Key, Modifiers, Surface, SurfaceEvent, SurfaceHandle, find_element};
use tokio::sync::oneshot;

use crate::config::ServiceConfig;
use crate::confirm::{ConfirmDialog, OverlayAction, Responder};
use crate::focus::{FocusManager, FocusSnapshot, PendingRestore, TrapAction};
use crate::guard::PointerGuard;
use crate::registry::{OpenOutcome, OverlayRegistry};
use crate::request::{OverlayHandle, OverlayId, OverlayKind, OverlayOptions, OverlayRequest};

/// Source of the current instant.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> Instant + Send + Sync>);

impl Clock {
    /// Wall clock.
    pub fn system() -> Self {
        Self(Arc::new(Instant::now))
    }

    pub fn new(now: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
        Self(Arc::new(now))
    }

    pub fn now(&self) -> Instant {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Clock")
    }
}

/// What the service did with an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// The event belongs to the application underneath.
    Ignored,
    /// An overlay consumed the event.
    Consumed,
}

#[derive(Debug)]
pub struct OverlayService {
    surface: SurfaceHandle,
    config: ServiceConfig,
    clock: Clock,
    registry: OverlayRegistry,
    focus: HashMap<OverlayKind, FocusManager>,
    pending_focus: Vec<PendingRestore>,
    guard: PointerGuard,
    responders: HashMap<OverlayId, Responder<bool>>,
}

impl OverlayService {
    pub fn new(surface: SurfaceHandle, config: ServiceConfig) -> Self {
        Self {
            surface,
            config,
            clock: Clock::system(),
            registry: OverlayRegistry::new(),
            focus: HashMap::new(),
            pending_focus: Vec::new(),
            guard: PointerGuard::new(config.guard_interval, config.correction_delay),
            responders: HashMap::new(),
        }
    }

    /// Replace the clock used for all timing decisions.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    /// Start the pointer guard.
    pub fn start(&mut self) {
        let now = self.clock.now();
        let mut surface = self.surface.lock();
        self.guard.start(&mut surface, now);
        info!("[overlay] service started");
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    // Public operations

    pub fn open_dialog(&mut self, content: impl Into<Arc<Element>>, options: OverlayOptions) -> OpenOutcome {
        self.open(OverlayKind::Dialog, content.into(), options)
    }

    pub fn close_dialog(&mut self) -> bool {
        self.close(OverlayKind::Dialog)
    }

    pub fn open_drawer(&mut self, content: impl Into<Arc<Element>>, options: OverlayOptions) -> OpenOutcome {
        self.open(OverlayKind::Drawer, content.into(), options)
    }

    pub fn close_drawer(&mut self) -> bool {
        self.close(OverlayKind::Drawer)
    }

    /// The active request of `kind`, for the component rendering the chrome.
    pub fn get_active(&self, kind: OverlayKind) -> Option<&OverlayRequest> {
        self.registry.get_active(kind)
    }

    /// Whether `handle` still names an open overlay.
    pub fn is_open(&self, handle: OverlayHandle) -> bool {
        self.registry.is_active(handle)
    }

    /// Close the overlay `handle` names. A handle whose overlay was already
    /// closed or replaced closes nothing.
    pub fn close_handle(&mut self, handle: OverlayHandle) -> bool {
        if !self.registry.is_active(handle) {
            debug!("[overlay] stale handle {} ignored", handle.id);
            return false;
        }
        self.close(handle.kind)
    }

    /// The overlay on top: the open one on the highest layer.
    pub fn top(&self) -> Option<OverlayKind> {
        [OverlayKind::Dialog, OverlayKind::Drawer]
            .into_iter()
            .filter(|kind| self.registry.get_active(*kind).is_some())
            .max_by_key(|kind| kind.layer())
    }

    /// Open a confirmation dialog. The receiver yields `true` when confirmed
    /// and `false` on cancel, dismissal, replacement or a refused open.
    pub fn confirm(&mut self, dialog: ConfirmDialog) -> (OpenOutcome, oneshot::Receiver<bool>) {
        let (content, options, responder, rx) = dialog.into_parts();
        let outcome = self.open_dialog(content, options);
        match outcome.handle() {
            Some(handle) => {
                self.responders.insert(handle.id, responder);
            }
            None => {
                responder.respond(false);
            }
        }
        (outcome, rx)
    }

    /// Open, in order: correct the root, register, mount the content, move
    /// focus in.
    ///
    /// The registry step runs without the surface lock held, so a replaced
    /// request's `on_close` may use the surface.
    pub fn open(&mut self, kind: OverlayKind, content: Arc<Element>, options: OverlayOptions) -> OpenOutcome {
        self.guard.correct(&mut self.surface.lock());

        // A drawer opened under a dialog stays behind it
        let covered = self.top().is_some_and(|top| top.layer() > kind.layer());
        let initial_focus = options.initial_focus.clone();
        let previous = self.registry.get_active(kind).map(OverlayRequest::id);
        let outcome = self.registry.open(kind, Arc::clone(&content), options);
        if outcome.is_ignored() {
            return outcome;
        }
        if let Some(previous) = previous {
            // Its on_close already answered false
            self.responders.remove(&previous);
        }

        let surface_handle = self.surface.clone();
        let mut surface = surface_handle.lock();
        surface.mount_layer(kind.layer(), Arc::clone(&content));

        let snapshot = match self.focus.remove(&kind) {
            Some(replaced) => replaced.into_snapshot(),
            None => self.adopt_pending_focus(&surface),
        };
        let manager = if covered {
            FocusManager::behind(snapshot)
        } else {
            FocusManager::with_snapshot(snapshot, &mut surface, &content, initial_focus.as_deref())
        };
        self.focus.insert(kind, manager);
        outcome
    }

    /// Close, in order: unregister (firing `on_close`), unmount, schedule
    /// focus restoration, correct the root. Closing an empty slot only
    /// corrects the root.
    ///
    /// `on_close` runs before the surface is locked.
    pub fn close(&mut self, kind: OverlayKind) -> bool {
        let now = self.clock.now();
        let closed = self.registry.close(kind);

        let surface_handle = self.surface.clone();
        let mut surface = surface_handle.lock();
        if let Some(request) = &closed {
            self.responders.remove(&request.id());
            surface.unmount_layer(kind.layer());
            if let Some(manager) = self.focus.remove(&kind) {
                let final_focus = request.options().final_focus.clone();
                self.pending_focus
                    .push(manager.on_close(now, self.config.focus_settle, final_focus));
            }
        }

        self.guard.correct(&mut surface);
        closed.is_some()
    }

    /// Route an input event through the open overlays.
    pub fn handle_event(&mut self, event: SurfaceEvent) -> EventResponse {
        let now = self.clock.now();
        let surface_handle = self.surface.clone();
        let mut surface = surface_handle.lock();

        if event.is_interaction() {
            self.guard.on_interaction(&mut surface);
        }
        self.guard.observe(&mut surface, now);

        let Some(top) = self.top() else {
            return EventResponse::Ignored;
        };
        let Some(request) = self.registry.get_active(top) else {
            return EventResponse::Ignored;
        };
        let content = Arc::clone(request.content());
        let locked = request.prevents_outside_close();

        let action = match event {
            SurfaceEvent::Key { key, modifiers } => {
                self.key_action(&mut surface, top, &content, key, modifiers, locked)
            }
            SurfaceEvent::PointerDown { target, .. } | SurfaceEvent::TouchStart { target } => {
                pointer_action(&content, target.as_deref(), locked)
            }
            SurfaceEvent::PointerMove { .. } => TrapAction::Ignored,
        };
        drop(surface);

        match action {
            TrapAction::Dismiss => {
                debug!("[overlay] dismiss {:?}", top);
                self.close(top);
                EventResponse::Consumed
            }
            TrapAction::Activate(action) => {
                self.activate(top, action);
                EventResponse::Consumed
            }
            TrapAction::Moved(_) => EventResponse::Consumed,
            TrapAction::Ignored => EventResponse::Ignored,
        }
    }

    fn key_action(
        &self,
        surface: &mut Surface,
        kind: OverlayKind,
        content: &Element,
        key: Key,
        modifiers: Modifiers,
        locked: bool,
    ) -> TrapAction {
        match self.focus.get(&kind) {
            Some(manager) => manager.handle_key(surface, content, key, modifiers, locked),
            None => TrapAction::Ignored,
        }
    }

    fn activate(&mut self, kind: OverlayKind, action: OverlayAction) {
        debug!("[overlay] {:?} action {}", kind, action.as_str());
        if action == OverlayAction::Confirm
            && let Some(id) = self.registry.get_active(kind).map(OverlayRequest::id)
            && let Some(responder) = self.responders.get(&id)
        {
            responder.respond(true);
        }
        self.close(kind);
    }

    /// Run due focus restorations and guard work.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        let surface_handle = self.surface.clone();
        let mut surface = surface_handle.lock();

        self.guard.tick(&mut surface, now);

        if self.pending_focus.iter().any(|p| p.is_due(now)) {
            let (mut due, rest): (Vec<_>, Vec<_>) =
                self.pending_focus.drain(..).partition(|p| p.is_due(now));
            self.pending_focus = rest;
            due.sort_by_key(PendingRestore::deadline);
            for pending in due {
                pending.restore(&mut surface);
            }
        }
    }

    /// Earliest instant `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_focus
            .iter()
            .map(PendingRestore::deadline)
            .chain(self.guard.next_deadline())
            .min()
    }

    /// Cancel pending restorations and stop the guard. Open overlays stay
    /// registered; their result channels are dropped.
    pub fn shutdown(&mut self) {
        if !self.pending_focus.is_empty() {
            debug!("[overlay] dropping {} pending focus restore(s)", self.pending_focus.len());
        }
        self.pending_focus.clear();
        self.responders.clear();
        let surface_handle = self.surface.clone();
        let mut surface = surface_handle.lock();
        self.guard.stop(&mut surface);
        info!("[overlay] service shut down");
    }

    /// Snapshot for a fresh open. With nothing focused (the previous
    /// overlay's restore still pending), the pending target stands in.
    /// Pending restores are dropped either way so they cannot pull focus
    /// out of the new overlay.
    fn adopt_pending_focus(&mut self, surface: &Surface) -> FocusSnapshot {
        let captured = FocusSnapshot::capture(surface);
        let latest = self
            .pending_focus
            .drain(..)
            .max_by_key(PendingRestore::deadline)
            .and_then(PendingRestore::into_target);
        if captured.is_empty() && latest.is_some() {
            debug!("[overlay] adopting pending focus target {:?}", latest);
            return FocusSnapshot::of(latest);
        }
        captured
    }
}

impl Drop for OverlayService {
    fn drop(&mut self) {
        let mut surface = self.surface.lock();
        self.guard.stop(&mut surface);
    }
}

/// Pointer-down or touch-start while `content` is on top.
fn pointer_action(content: &Element, target: Option<&str>, locked: bool) -> TrapAction {
    match target.and_then(|id| find_element(content, id)) {
        Some(element) => OverlayAction::of(element).map_or(TrapAction::Ignored, TrapAction::Activate),
        None if locked => {
            debug!("[overlay] outside press suppressed, {} is locked", content.id);
            TrapAction::Ignored
        }
        None => TrapAction::Dismiss,
    }
}
