//! Element tree and root surface state for overlay hosts.
//!
//! A [`Surface`] is the application's top-level interactive container: the
//! mounted element tree, portal layers for overlays, the focused element and
//! the global pointer/scroll attributes.

pub mod element;
pub mod event;
pub mod focus;
pub mod mutation;
pub mod rect;
pub mod surface;

pub use element::{find_element, Content, Element, ElementKind};
pub use event::{Key, Modifiers, SurfaceEvent};
pub use focus::{collect_tabbable, cycle_tabbable, first_tabbable, TabDirection};
pub use mutation::Mutation;
pub use rect::Rect;
pub use surface::{Layer, PointerEvents, Surface, SurfaceError, SurfaceHandle};
