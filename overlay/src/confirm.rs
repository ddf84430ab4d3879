//! Confirmation dialogs and overlay actions.
//!
//! Elements inside overlay content can carry an action tag under
//! [`ACTION_KEY`]. Activating a tagged element (click, touch, Enter or
//! Space) makes the service confirm or close the overlay. Confirmation
//! dialogs report their outcome through a oneshot channel.

use std::sync::{Arc, Mutex};

use surface::Element;
use tokio::sync::oneshot;

use crate::request::{OverlayOptions, OverlaySize};

/// Data key for action tags on overlay elements.
pub const ACTION_KEY: &str = "overlay-action";

/// What activating a tagged element does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// Resolve the overlay's result with `true`, then close.
    Confirm,
    /// Close; a pending result resolves `false`.
    Cancel,
    /// Close without a result of its own.
    Close,
}

impl OverlayAction {
    pub fn as_str(self) -> &'static str {
        match self {
            OverlayAction::Confirm => "confirm",
            OverlayAction::Cancel => "cancel",
            OverlayAction::Close => "close",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirm" => Some(OverlayAction::Confirm),
            "cancel" => Some(OverlayAction::Cancel),
            "close" => Some(OverlayAction::Close),
            _ => None,
        }
    }

    /// The action tagged on `element`, if any.
    pub fn of(element: &Element) -> Option<Self> {
        element.get_data(ACTION_KEY).and_then(|value| Self::parse(value))
    }

    /// Tag `element` with this action.
    pub fn tag(self, element: Element) -> Element {
        element.data(ACTION_KEY, self.as_str())
    }
}

/// Sends an overlay's result back to whoever opened it, at most once.
///
/// Clones share the same channel; the first `respond` wins.
pub struct Responder<R> {
    tx: Arc<Mutex<Option<oneshot::Sender<R>>>>,
}

impl<R> Responder<R> {
    pub fn channel() -> (Self, oneshot::Receiver<R>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Send `result` unless something was sent already.
    /// Returns true if this call delivered the result.
    pub fn respond(&self, result: R) -> bool {
        let sender = self.tx.lock().unwrap_or_else(|e| e.into_inner()).take();
        match sender {
            // A dropped receiver still counts as answered
            Some(tx) => {
                let _ = tx.send(result);
                true
            }
            None => false,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.tx.lock().unwrap_or_else(|e| e.into_inner()).is_none()
    }
}

impl<R> Clone for Responder<R> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<R> std::fmt::Debug for Responder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("answered", &self.is_answered())
            .finish()
    }
}

/// A yes/no confirmation dialog.
///
/// ```ignore
/// let (_, answer) = service.confirm(ConfirmDialog::new("Cancel this transfer?"));
/// if answer.await.unwrap_or(false) {
///     // cancel it
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    title: String,
    message: String,
    confirm_label: String,
    cancel_label: String,
    locked: bool,
    size: OverlaySize,
}

impl ConfirmDialog {
    /// Create a new confirmation dialog with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "Confirm".into(),
            message: message.into(),
            confirm_label: "Ok".into(),
            cancel_label: "Cancel".into(),
            locked: false,
            size: OverlaySize::Sm,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    /// Only the buttons may answer; Escape and outside clicks are ignored.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn size(mut self, size: OverlaySize) -> Self {
        self.size = size;
        self
    }

    /// Build the dialog content. Cancel comes first so it takes initial focus.
    pub fn element(&self) -> Element {
        Element::col()
            .child(Element::text(self.title.clone()))
            .child(Element::text(self.message.clone()))
            .child(
                Element::row()
                    .child(OverlayAction::Cancel.tag(Element::button(self.cancel_label.clone())))
                    .child(OverlayAction::Confirm.tag(Element::button(self.confirm_label.clone()))),
            )
    }

    /// Content, options and the result channel.
    ///
    /// The options' `on_close` answers `false` if the dialog closes before
    /// anything else answered.
    pub(crate) fn into_parts(self) -> (Element, OverlayOptions, Responder<bool>, oneshot::Receiver<bool>) {
        let (responder, rx) = Responder::channel();
        let on_close = responder.clone();
        let options = OverlayOptions::new()
            .size(self.size)
            .prevent_outside_close(self.locked)
            .on_close(move || {
                on_close.respond(false);
            });
        (self.element(), options, responder, rx)
    }
}
