//! Fire-and-forget event bus.
//!
//! Typed channel carrying `PresenceChanged` events from the writers and the
//! sweeper to the notifier. Publishers never block on subscriber
//! processing; delivery is best-effort, at-most-once. The single consumer
//! task preserves per-user event order.

use tokio::sync::mpsc;
use tracing::debug;

use livedesk_core::PresenceChanged;

/// Publisher handle, cheap to clone and share across writers
#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<PresenceChanged>,
}

/// Consumer half of the bus, held by the notifier task
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<PresenceChanged>,
}

impl EventBus {
    /// Create a connected publisher/consumer pair
    #[must_use]
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, EventReceiver { rx })
    }

    /// Publish an event. Never blocks; a closed bus drops the event.
    pub fn publish(&self, event: PresenceChanged) {
        if let Err(e) = self.tx.send(event) {
            debug!(user = %e.0.user, "Event bus closed, dropping presence event");
        }
    }
}

impl EventReceiver {
    /// Receive the next event, or `None` once every publisher is gone
    pub async fn recv(&mut self) -> Option<PresenceChanged> {
        self.rx.recv().await
    }
}
