//! Overlay requests and their options.
//!
//! An [`OverlayRequest`] describes one open dialog or drawer: the content to
//! show (shared with the caller, never copied), how it should be presented,
//! and how it reacts to dismissal.

use std::fmt;
use std::sync::Arc;

use surface::{Element, Layer};

/// Which overlay slot a request occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Centered modal overlay.
    Dialog,
    /// Edge-anchored sliding overlay.
    Drawer,
}

impl OverlayKind {
    /// The portal layer this kind is mounted into.
    pub fn layer(self) -> Layer {
        match self {
            OverlayKind::Dialog => Layer::Dialog,
            OverlayKind::Drawer => Layer::Drawer,
        }
    }
}

/// Overlay size class.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OverlaySize {
    /// Kind-specific default (medium dialogs, small drawers).
    #[default]
    Auto,
    /// Small preset (30% of screen).
    Sm,
    /// Medium preset (50% of screen).
    Md,
    /// Large preset (80% of screen).
    Lg,
    /// Extra large preset (90% of screen).
    Xl,
    /// Whole screen.
    Full,
    /// Fixed size in cells.
    Fixed { width: u16, height: u16 },
}

/// Screen edge a drawer slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerSide {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

/// Callback fired once when an overlay closes, for whatever reason.
pub type OnClose = Box<dyn FnOnce() + Send + 'static>;

/// Presentation and behavior options for an overlay.
#[derive(Default)]
pub struct OverlayOptions {
    pub size: OverlaySize,
    /// Drawer only.
    pub side: DrawerSide,
    /// Ignore Escape and outside clicks, and refuse replacement while open.
    pub prevent_outside_close: bool,
    pub on_close: Option<OnClose>,
    /// Drawer only.
    pub title: Option<String>,
    /// Drawer only.
    pub description: Option<String>,
    /// Element to focus on open instead of the first tabbable one.
    pub initial_focus: Option<String>,
    /// Element to focus on close instead of the one focused before open.
    pub final_focus: Option<String>,
}

impl OverlayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: OverlaySize) -> Self {
        self.size = size;
        self
    }

    pub fn side(mut self, side: DrawerSide) -> Self {
        self.side = side;
        self
    }

    pub fn prevent_outside_close(mut self, prevent: bool) -> Self {
        self.prevent_outside_close = prevent;
        self
    }

    /// Called once when the overlay closes or is replaced. It runs with no
    /// surface lock held and may use the surface.
    pub fn on_close(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn initial_focus(mut self, id: impl Into<String>) -> Self {
        self.initial_focus = Some(id.into());
        self
    }

    pub fn final_focus(mut self, id: impl Into<String>) -> Self {
        self.final_focus = Some(id.into());
        self
    }
}

impl fmt::Debug for OverlayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayOptions")
            .field("size", &self.size)
            .field("side", &self.side)
            .field("prevent_outside_close", &self.prevent_outside_close)
            .field("on_close", &self.on_close.as_ref().map(|_| "..."))
            .field("title", &self.title)
            .field("description", &self.description)
            .field("initial_focus", &self.initial_focus)
            .field("final_focus", &self.final_focus)
            .finish()
    }
}

/// Identity of one open call. Never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub(crate) u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// Returned from a successful open; names exactly that request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle {
    pub kind: OverlayKind,
    pub id: OverlayId,
}

/// One open overlay.
#[derive(Debug)]
pub struct OverlayRequest {
    id: OverlayId,
    kind: OverlayKind,
    content: Arc<Element>,
    options: OverlayOptions,
    is_open: bool,
}

impl OverlayRequest {
    pub(crate) fn new(
        id: OverlayId,
        kind: OverlayKind,
        content: Arc<Element>,
        mut options: OverlayOptions,
    ) -> Self {
        if kind == OverlayKind::Dialog && (options.title.is_some() || options.description.is_some()) {
            log::debug!("[overlay] title/description are drawer-only, dropped for dialog {id}");
            options.title = None;
            options.description = None;
        }
        Self {
            id,
            kind,
            content,
            options,
            is_open: true,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn handle(&self) -> OverlayHandle {
        OverlayHandle {
            kind: self.kind,
            id: self.id,
        }
    }

    /// The caller's content, shared.
    pub fn content(&self) -> &Arc<Element> {
        &self.content
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn title(&self) -> Option<&str> {
        self.options.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.options.description.as_deref()
    }

    pub fn prevents_outside_close(&self) -> bool {
        self.options.prevent_outside_close
    }

    /// Mark closed and fire `on_close`. Only the first call fires.
    pub(crate) fn close(&mut self) -> bool {
        self.is_open = false;
        match self.options.on_close.take() {
            Some(on_close) => {
                on_close();
                true
            }
            None => false,
        }
    }
}
