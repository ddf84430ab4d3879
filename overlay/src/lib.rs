//! Dialog and drawer management over a [`surface::Surface`].
//!
//! [`OverlayService`] is the entry point: it keeps at most one dialog and one
//! drawer open, moves focus into an overlay and back out of it, and runs a
//! pointer guard that keeps the root surface interactive. [`OverlayDriver`]
//! runs the service on a tokio task.

pub mod config;
pub mod confirm;
pub mod driver;
pub mod focus;
pub mod guard;
pub mod layout;
pub mod registry;
pub mod request;
pub mod service;

pub use config::ServiceConfig;
pub use confirm::{ACTION_KEY, ConfirmDialog, OverlayAction, Responder};
pub use driver::{OverlayDriver, OverlayError};
pub use focus::{FocusManager, FocusSnapshot, PendingRestore, TrapAction};
pub use guard::PointerGuard;
pub use layout::overlay_area;
pub use registry::{OpenOutcome, OverlayRegistry};
pub use request::{
    DrawerSide, OnClose, OverlayHandle, OverlayId, OverlayKind, OverlayOptions, OverlayRequest,
    OverlaySize,
};
pub use service::{Clock, EventResponse, OverlayService};

pub mod prelude {
    pub use crate::config::ServiceConfig;
    pub use crate::confirm::{ConfirmDialog, OverlayAction};
    pub use crate::driver::OverlayDriver;
    pub use crate::registry::OpenOutcome;
    pub use crate::request::{DrawerSide, OverlayKind, OverlayOptions, OverlaySize};
    pub use crate::service::{EventResponse, OverlayService};

    pub use surface::{Element, Surface, SurfaceEvent, SurfaceHandle};
}
