//! Presence change notifier
//!
//! The only component that talks to the notification transport. For each
//! `PresenceChanged` event it addresses the subject's own room, then the
//! rooms of the counterparts resolved from the chat relationships - each
//! exactly once, never a tenant-wide broadcast room.

use futures_util::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use livedesk_core::{PresenceChanged, RoomSink, PRESENCE_UPDATE};

use super::context::ServiceContext;
use super::resolver::ChatRelationshipResolver;
use crate::events::EventReceiver;

/// Consumes presence change events and fans them out to interested rooms
pub struct PresenceChangeNotifier {
    resolver: ChatRelationshipResolver,
    sink: Arc<dyn RoomSink>,
}

impl PresenceChangeNotifier {
    pub fn new(resolver: ChatRelationshipResolver, sink: Arc<dyn RoomSink>) -> Self {
        Self { resolver, sink }
    }

    pub fn from_context(ctx: &ServiceContext) -> Self {
        Self::new(
            ChatRelationshipResolver::from_context(ctx),
            Arc::clone(ctx.sink()),
        )
    }

    /// Spawn the consumer task draining the event bus into this notifier.
    /// The task ends once every publisher handle is dropped.
    pub fn start(self: Arc<Self>, mut receiver: EventReceiver) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                self.on_presence_changed(&event).await;
            }
            debug!("Event bus closed, notifier stopped");
        })
    }

    /// Fan a presence change out to the subject and its counterparts.
    ///
    /// Emission is best-effort: the subject's room is always attempted
    /// first, resolver failures degrade to self-only, and one counterpart
    /// failing never stops the remaining emissions.
    #[instrument(skip(self, event), fields(user = %event.user, status = %event.new))]
    pub async fn on_presence_changed(&self, event: &PresenceChanged) {
        let payload = event.payload();

        if let Err(e) = self
            .sink
            .emit_to_room(&event.user.room(), PRESENCE_UPDATE, &payload)
            .await
        {
            warn!(room = %event.user.room(), error = %e, "Failed to notify own room");
        }

        let counterparts = self.resolver.active_counterparts(&event.user).await;
        if counterparts.is_empty() {
            return;
        }

        // Already deduplicated by the resolver; dispatch concurrently since
        // each emission is fire-and-forget and idempotent for the receiver
        let results = join_all(counterparts.iter().map(|counterpart| {
            let room = counterpart.room();
            let payload = &payload;
            async move {
                let result = self.sink.emit_to_room(&room, PRESENCE_UPDATE, payload).await;
                (room, result)
            }
        }))
        .await;

        let mut delivered = 0usize;
        for (room, result) in results {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => warn!(room = %room, error = %e, "Failed to notify counterpart room"),
            }
        }

        debug!(
            counterparts = counterparts.len(),
            delivered, "Presence fan-out completed"
        );
    }
}
