#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use overlay::{Clock, OverlayService, ServiceConfig};
use surface::{Element, Surface, SurfaceHandle};

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn clock(&self) -> Clock {
        let now = Arc::clone(&self.now);
        Clock::new(move || *now.lock().unwrap())
    }
}

/// Transfers screen: a toolbar with `#save` and `#export`.
pub fn app() -> Element {
    Element::col()
        .id("app")
        .child(
            Element::row()
                .id("toolbar")
                .child(Element::button("Save").id("save"))
                .child(Element::button("Export").id("export")),
        )
        .child(Element::text("12 transfers today").id("summary"))
}

/// Booking form dialog content.
pub fn booking_form(id: &str) -> Element {
    Element::col()
        .id(id)
        .child(Element::text("New booking"))
        .child(Element::input("").id(format!("{id}-pickup")))
        .child(Element::button("Close").id(format!("{id}-close")))
}

pub struct Harness {
    pub service: OverlayService,
    pub surface: SurfaceHandle,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let surface = SurfaceHandle::new(Surface::with_root(app()));
        let clock = ManualClock::new();
        let mut service = OverlayService::new(surface.clone(), config)
            .with_clock(clock.clock());
        service.start();
        Self {
            service,
            surface,
            clock,
        }
    }

    pub fn focus(&self, id: &str) {
        self.surface.with(|s| s.focus(id)).unwrap();
    }

    pub fn focused(&self) -> Option<String> {
        self.surface.lock().focused().map(str::to_string)
    }

    /// Let the focus settle delay pass.
    pub fn settle(&mut self) {
        self.clock.advance(self.service.config().focus_settle);
        self.service.tick();
    }
}
