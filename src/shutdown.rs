//! Cancellation plumbing for the serve loops.
//!
//! Shutdown is signalled over a `watch` channel rather than through a shared
//! flag: the serve loops observe it with `tokio::select!` alongside their
//! blocking accept/receive call, so "closed because of shutdown" and "closed
//! because of a fault" are distinguished structurally. Dropping the trigger
//! without firing it counts as a shutdown request.

use tokio::sync::watch;

/// Create a linked trigger/watcher pair.
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

/// Requests shutdown. Triggering more than once has no further effect.
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Request shutdown. Idempotent.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observes a shutdown request. Cloneable so each serve loop can hold its own.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Completes once shutdown has been requested.
    pub async fn requested(&mut self) {
        if *self.rx.borrow() {
            return;
        }
        loop {
            match self.rx.changed().await {
                Ok(()) => {
                    if *self.rx.borrow() {
                        return;
                    }
                }
                // Trigger dropped: treat as a request.
                Err(_) => return,
            }
        }
    }

    /// Whether shutdown has been requested, without waiting.
    pub fn is_requested(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }
}
