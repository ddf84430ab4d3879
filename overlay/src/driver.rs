//! Tokio driver for the overlay service.
//!
//! The service itself is synchronous and only acts when called. The driver
//! owns it on a background task, feeds it input events, and sleeps until
//! the service's next deadline so focus restorations and guard corrections
//! fire on time.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use surface::SurfaceEvent;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant as TokioInstant, sleep_until};

use crate::service::{Clock, OverlayService};

/// Driver errors.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("overlay driver has stopped")]
    Stopped,
    #[error("overlay driver task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

enum Command {
    Event(SurfaceEvent),
    /// The service was touched from outside; recompute the deadline.
    Wakeup,
}

/// Runs an [`OverlayService`] on a tokio task.
pub struct OverlayDriver {
    service: Arc<Mutex<OverlayService>>,
    tx: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl OverlayDriver {
    /// Start the service and spawn its event loop on the current runtime.
    ///
    /// The service's clock is switched to tokio's so paused test time and
    /// real time behave the same.
    pub fn spawn(mut service: OverlayService) -> Self {
        service.set_clock(Clock::new(|| TokioInstant::now().into_std()));
        service.start();

        let service = Arc::new(Mutex::new(service));
        let (tx, rx) = mpsc::channel(64);
        let task = tokio::spawn(event_loop(Arc::clone(&service), rx));
        Self { service, tx, task }
    }

    /// Deliver an input event.
    pub async fn send(&self, event: SurfaceEvent) -> Result<(), OverlayError> {
        self.tx
            .send(Command::Event(event))
            .await
            .map_err(|_| OverlayError::Stopped)
    }

    /// Run `f` against the service, then wake the loop so new deadlines
    /// are picked up.
    ///
    /// The service stays locked while `f` runs; callbacks it triggers must
    /// not call back into the driver.
    pub fn with_service<R>(&self, f: impl FnOnce(&mut OverlayService) -> R) -> R {
        let result = f(&mut *lock(&self.service));
        // Full channel: the loop is awake anyway
        let _ = self.tx.try_send(Command::Wakeup);
        result
    }

    /// Stop the loop, tear the service down and wait for the task.
    pub async fn shutdown(self) -> Result<(), OverlayError> {
        let Self { tx, task, .. } = self;
        drop(tx);
        task.await?;
        debug!("[driver] stopped");
        Ok(())
    }
}

fn lock(service: &Mutex<OverlayService>) -> MutexGuard<'_, OverlayService> {
    service.lock().unwrap_or_else(|e| e.into_inner())
}

async fn event_loop(service: Arc<Mutex<OverlayService>>, mut rx: mpsc::Receiver<Command>) {
    debug!("[driver] event loop started");
    loop {
        let deadline = lock(&service).next_deadline();

        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Event(event)) => {
                    lock(&service).handle_event(event);
                }
                Some(Command::Wakeup) => {}
                None => break,
            },
            _ = sleep_until_deadline(deadline) => {}
        }

        lock(&service).tick();
    }

    let mut service = lock(&service);
    if !service.is_running() {
        warn!("[driver] service was not running at shutdown");
    }
    service.shutdown();
}

async fn sleep_until_deadline(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => sleep_until(TokioInstant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
