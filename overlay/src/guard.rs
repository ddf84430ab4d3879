//! Pointer-event guard.
//!
//! Overlay toolkits disable pointer input on the root surface (and lock its
//! scrolling) while an overlay is open, and are supposed to undo it on close.
//! When that cleanup is missed the whole application stops reacting to the
//! pointer. The guard keeps the root usable by writing "enabled" on a fixed
//! interval, on every pointer interaction, and shortly after any attribute
//! mutation that leaves the root degraded.
//!
//! Every correction is an unconditional write of the good state, so firing
//! twice, late or out of order is harmless.

use std::time::{Duration, Instant};

use log::{debug, trace};
use surface::{PointerEvents, Surface, SurfaceError};

/// Shortest interval the guard runs at. A zero interval would make every
/// deadline already due.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    /// Created, not started. Forced corrections still apply.
    Idle,
    /// Interval and mutation observer active.
    Running,
    /// Torn down. The guard never touches the surface again.
    Stopped,
}

#[derive(Debug)]
pub struct PointerGuard {
    state: GuardState,
    interval: Duration,
    correction_delay: Duration,
    next_interval: Option<Instant>,
    pending_correction: Option<Instant>,
    corrections: u64,
}

impl PointerGuard {
    pub fn new(interval: Duration, correction_delay: Duration) -> Self {
        if interval < MIN_INTERVAL {
            debug!("[guard] interval {:?} raised to {:?}", interval, MIN_INTERVAL);
        }
        Self {
            state: GuardState::Idle,
            interval: interval.max(MIN_INTERVAL),
            correction_delay,
            next_interval: None,
            pending_correction: None,
            corrections: 0,
        }
    }

    /// Start the interval and attach the mutation observer.
    /// Starting twice is a no-op; a stopped guard stays stopped.
    pub fn start(&mut self, surface: &mut Surface, now: Instant) {
        match self.state {
            GuardState::Running => return,
            GuardState::Stopped => {
                debug!("[guard] start after teardown ignored");
                return;
            }
            GuardState::Idle => {}
        }
        debug!(
            "[guard] start (interval {:?}, correction delay {:?})",
            self.interval, self.correction_delay
        );
        self.state = GuardState::Running;
        surface.set_observed(true);
        self.enable_pointer(surface);
        self.next_interval = Some(now + self.interval);
    }

    /// Cancel timers and detach the observer.
    pub fn stop(&mut self, surface: &mut Surface) {
        if self.state == GuardState::Stopped {
            return;
        }
        debug!("[guard] stop after {} corrections", self.corrections);
        self.state = GuardState::Stopped;
        self.next_interval = None;
        self.pending_correction = None;
        surface.set_observed(false);
    }

    pub fn is_running(&self) -> bool {
        self.state == GuardState::Running
    }

    /// Number of writes that actually changed the surface.
    pub fn corrections(&self) -> u64 {
        self.corrections
    }

    /// Force the root back to an interactive state right now.
    pub fn correct(&mut self, surface: &mut Surface) {
        if self.state == GuardState::Stopped {
            return;
        }
        self.enable_pointer(surface);
    }

    /// Pointer-down, touch-start or pointer-move on the surface.
    pub fn on_interaction(&mut self, surface: &mut Surface) {
        if self.state != GuardState::Running {
            return;
        }
        self.enable_pointer(surface);
    }

    /// Drain root mutations and schedule a delayed correction when the root
    /// was left with pointer input disabled or scrolling locked.
    ///
    /// The delay lets an overlay's own open transition finish first.
    pub fn observe(&mut self, surface: &mut Surface, now: Instant) {
        if self.state != GuardState::Running {
            return;
        }
        let mutations = surface.take_mutations();
        if mutations.is_empty() {
            return;
        }
        let degraded = !surface.is_interactive() || surface.is_scroll_locked();
        trace!("[guard] {} mutation(s), degraded={}", mutations.len(), degraded);
        if degraded && self.pending_correction.is_none() {
            let at = now + self.correction_delay;
            debug!("[guard] root degraded, correcting in {:?}", self.correction_delay);
            self.pending_correction = Some(at);
        }
    }

    /// Run whatever is due at `now`.
    pub fn tick(&mut self, surface: &mut Surface, now: Instant) {
        if self.state != GuardState::Running {
            return;
        }
        self.observe(surface, now);

        if self.pending_correction.is_some_and(|at| now >= at) {
            self.pending_correction = None;
            self.release(surface);
        }

        if self.next_interval.is_some_and(|at| now >= at) {
            trace!("[guard] interval");
            self.enable_pointer(surface);
            // Missed intervals collapse into one
            self.next_interval = Some(now + self.interval);
        }
    }

    /// Earliest instant `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.next_interval, self.pending_correction) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn enable_pointer(&mut self, surface: &mut Surface) {
        let before = surface.pointer_events();
        match surface.set_pointer_events(PointerEvents::Auto) {
            Ok(()) if before != PointerEvents::Auto => {
                debug!("[guard] re-enabled pointer events");
                self.corrections += 1;
            }
            Ok(()) => {}
            Err(e) => not_mounted(e),
        }
    }

    fn release(&mut self, surface: &mut Surface) {
        self.enable_pointer(surface);
        let was_locked = surface.is_scroll_locked();
        match surface.set_scroll_locked(false) {
            Ok(()) if was_locked => {
                debug!("[guard] released scroll lock");
                self.corrections += 1;
            }
            Ok(()) => {}
            Err(e) => not_mounted(e),
        }
    }
}

fn not_mounted(e: SurfaceError) {
    // Root not there yet; the next interval retries
    debug!("[guard] correction skipped: {e}");
}
