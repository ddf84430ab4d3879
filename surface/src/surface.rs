//! The root surface: the mounted element tree plus the global interaction
//! state overlays manipulate.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::element::{find_element, Element};
use crate::mutation::Mutation;

/// Errors from root surface operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("root surface is not mounted")]
    NotMounted,
    #[error("element not found: {0}")]
    ElementNotFound(String),
    #[error("element is not focusable: {0}")]
    NotFocusable(String),
}

/// Global pointer interaction flag of the root surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerEvents {
    /// Pointer input reaches the application (default).
    #[default]
    Auto,
    /// Pointer input is swallowed everywhere.
    None,
}

/// Portal layers rendered above the application root.
///
/// Ordered bottom to top: a dialog always covers a drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Drawer,
    Dialog,
}

#[derive(Debug, Default)]
pub struct Surface {
    root: Option<Element>,
    layers: BTreeMap<Layer, Arc<Element>>,
    focused: Option<String>,
    pointer_events: PointerEvents,
    scroll_locked: bool,
    observed: bool,
    mutations: Vec<Mutation>,
}

impl Surface {
    /// Create an empty, unmounted surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface with `root` already mounted.
    pub fn with_root(root: Element) -> Self {
        Self {
            root: Some(root),
            ..Default::default()
        }
    }

    // Tree

    /// Mount (or replace) the application root.
    pub fn mount(&mut self, root: Element) {
        log::debug!("[surface] mount root {}", root.id);
        self.root = Some(root);
        self.drop_detached_focus();
    }

    /// Remove the application root. Portal layers stay mounted.
    pub fn unmount(&mut self) -> Option<Element> {
        let root = self.root.take();
        self.drop_detached_focus();
        root
    }

    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Mount overlay content into a portal layer, replacing what was there.
    /// The layer shares the content with its owner.
    pub fn mount_layer(&mut self, layer: Layer, content: impl Into<Arc<Element>>) {
        let content = content.into();
        log::debug!("[surface] mount {:?} layer ({})", layer, content.id);
        self.layers.insert(layer, content);
        self.drop_detached_focus();
    }

    /// Remove a portal layer. Focus inside it falls back to nothing.
    pub fn unmount_layer(&mut self, layer: Layer) -> Option<Arc<Element>> {
        let removed = self.layers.remove(&layer);
        if removed.is_some() {
            log::debug!("[surface] unmount {:?} layer", layer);
            self.drop_detached_focus();
        }
        removed
    }

    pub fn layer(&self, layer: Layer) -> Option<&Element> {
        self.layers.get(&layer).map(Arc::as_ref)
    }

    /// Find an attached element by ID, searching the root then the layers.
    pub fn find(&self, id: &str) -> Option<&Element> {
        self.root
            .iter()
            .chain(self.layers.values().map(Arc::as_ref))
            .find_map(|tree| find_element(tree, id))
    }

    pub fn is_attached(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    // Focus

    /// The currently focused element ID.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Programmatically focus an element by ID.
    /// Returns true if focus changed.
    pub fn focus(&mut self, id: &str) -> Result<bool, SurfaceError> {
        let element = self
            .find(id)
            .ok_or_else(|| SurfaceError::ElementNotFound(id.to_string()))?;
        if !element.is_focusable() {
            return Err(SurfaceError::NotFocusable(id.to_string()));
        }
        if self.focused.as_deref() == Some(id) {
            return Ok(false);
        }
        self.focused = Some(id.to_string());
        Ok(true)
    }

    /// Clear focus.
    /// Returns true if there was something focused.
    pub fn blur(&mut self) -> bool {
        self.focused.take().is_some()
    }

    fn drop_detached_focus(&mut self) {
        let detached = self
            .focused
            .as_deref()
            .is_some_and(|id| self.find(id).is_none());
        if detached {
            log::debug!("[surface] focused element {:?} detached", self.focused);
            self.focused = None;
        }
    }

    // Root attributes

    pub fn pointer_events(&self) -> PointerEvents {
        self.pointer_events
    }

    /// Whether pointer input currently reaches the application.
    pub fn is_interactive(&self) -> bool {
        self.pointer_events == PointerEvents::Auto
    }

    pub fn set_pointer_events(&mut self, value: PointerEvents) -> Result<(), SurfaceError> {
        if self.root.is_none() {
            return Err(SurfaceError::NotMounted);
        }
        if self.pointer_events != value {
            self.pointer_events = value;
            self.record(Mutation::PointerEvents(value));
        }
        Ok(())
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn set_scroll_locked(&mut self, locked: bool) -> Result<(), SurfaceError> {
        if self.root.is_none() {
            return Err(SurfaceError::NotMounted);
        }
        if self.scroll_locked != locked {
            self.scroll_locked = locked;
            self.record(Mutation::ScrollLock(locked));
        }
        Ok(())
    }

    // Observation

    /// Start or stop recording root attribute mutations.
    /// Stopping discards anything still queued.
    pub fn set_observed(&mut self, observed: bool) {
        self.observed = observed;
        if !observed {
            self.mutations.clear();
        }
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    /// Drain recorded mutations in the order they happened.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    fn record(&mut self, mutation: Mutation) {
        if self.observed {
            self.mutations.push(mutation);
        }
    }
}

/// Shared reference to a [`Surface`].
///
/// Cloning yields another handle to the same surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceHandle {
    inner: Arc<Mutex<Surface>>,
}

impl SurfaceHandle {
    pub fn new(surface: Surface) -> Self {
        Self {
            inner: Arc::new(Mutex::new(surface)),
        }
    }

    /// Lock the surface. A poisoned lock is recovered, the surface state is
    /// plain data and stays usable.
    pub fn lock(&self) -> MutexGuard<'_, Surface> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` with exclusive access to the surface.
    pub fn with<R>(&self, f: impl FnOnce(&mut Surface) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<Surface> for SurfaceHandle {
    fn from(surface: Surface) -> Self {
        Self::new(surface)
    }
}
