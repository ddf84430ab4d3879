//! Registry of the active overlays.
//!
//! Holds at most one dialog and one drawer. The registry only tracks
//! requests and fires their close callbacks; focus and pointer state are
//! handled by the service that owns it.

use std::sync::Arc;

use log::{debug, warn};
use surface::Element;

use crate::request::{OverlayHandle, OverlayId, OverlayKind, OverlayOptions, OverlayRequest};

/// Result of an open call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The slot was empty.
    Opened(OverlayHandle),
    /// A previous request was closed (its `on_close` fired) and replaced.
    Replaced(OverlayHandle),
    /// The slot holds a request that refuses replacement; nothing changed.
    Ignored,
}

impl OpenOutcome {
    pub fn handle(self) -> Option<OverlayHandle> {
        match self {
            OpenOutcome::Opened(handle) | OpenOutcome::Replaced(handle) => Some(handle),
            OpenOutcome::Ignored => None,
        }
    }

    pub fn is_ignored(self) -> bool {
        self == OpenOutcome::Ignored
    }
}

#[derive(Debug, Default)]
pub struct OverlayRegistry {
    dialog: Option<OverlayRequest>,
    drawer: Option<OverlayRequest>,
    next_id: u64,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: OverlayKind) -> &Option<OverlayRequest> {
        match kind {
            OverlayKind::Dialog => &self.dialog,
            OverlayKind::Drawer => &self.drawer,
        }
    }

    fn slot_mut(&mut self, kind: OverlayKind) -> &mut Option<OverlayRequest> {
        match kind {
            OverlayKind::Dialog => &mut self.dialog,
            OverlayKind::Drawer => &mut self.drawer,
        }
    }

    /// Register a request of `kind`.
    ///
    /// A locked request (`prevent_outside_close`) in the slot makes this a
    /// logged no-op. Any other occupant is closed first, firing its
    /// `on_close`, then replaced.
    pub fn open(
        &mut self,
        kind: OverlayKind,
        content: Arc<Element>,
        options: OverlayOptions,
    ) -> OpenOutcome {
        if let Some(existing) = self.slot(kind)
            && existing.prevents_outside_close()
        {
            warn!(
                "[overlay] {:?} {} is open and locked, ignoring open of {}",
                kind,
                existing.id(),
                content.id
            );
            return OpenOutcome::Ignored;
        }

        let replaced = match self.slot_mut(kind).take() {
            Some(mut previous) => {
                debug!("[overlay] replacing {:?} {}", kind, previous.id());
                previous.close();
                true
            }
            None => false,
        };

        self.next_id += 1;
        let request = OverlayRequest::new(OverlayId(self.next_id), kind, content, options);
        let handle = request.handle();
        debug!("[overlay] open {:?} {} ({})", kind, handle.id, request.content().id);
        *self.slot_mut(kind) = Some(request);

        if replaced {
            OpenOutcome::Replaced(handle)
        } else {
            OpenOutcome::Opened(handle)
        }
    }

    /// Clear the slot of `kind`, firing the request's `on_close`.
    /// Returns the closed request, or None when the slot was empty.
    pub fn close(&mut self, kind: OverlayKind) -> Option<OverlayRequest> {
        let Some(mut request) = self.slot_mut(kind).take() else {
            debug!("[overlay] close {:?}: nothing open", kind);
            return None;
        };
        debug!("[overlay] close {:?} {}", kind, request.id());
        request.close();
        Some(request)
    }

    /// The active request of `kind`, for renderers.
    pub fn get_active(&self, kind: OverlayKind) -> Option<&OverlayRequest> {
        self.slot(kind).as_ref()
    }

    /// Whether `handle` still names the active request of its kind.
    pub fn is_active(&self, handle: OverlayHandle) -> bool {
        self.get_active(handle.kind)
            .is_some_and(|request| request.id() == handle.id)
    }

    /// Number of open overlays (0 to 2).
    pub fn len(&self) -> usize {
        usize::from(self.dialog.is_some()) + usize::from(self.drawer.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
