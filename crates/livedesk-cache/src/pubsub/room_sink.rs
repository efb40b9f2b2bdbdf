//! Redis Pub/Sub implementation of the room-addressed notification sink.
//!
//! Publishes presence payloads to one Redis channel per logical room; a
//! gateway process subscribed to its connected users' rooms forwards them
//! to client sockets. Delivery is fire-and-forget: zero subscribers is a
//! normal outcome, not an error.

use async_trait::async_trait;
use serde::Serialize;

use livedesk_core::{RoomSink, SinkError};

use crate::pool::RedisPool;

/// Channel prefix for room-addressed events
pub const ROOM_CHANNEL_PREFIX: &str = "room:";

/// Envelope published on a room channel
#[derive(Debug, Clone, Serialize)]
struct RoomMessage<'a> {
    /// Event type name (e.g., "PRESENCE_UPDATE")
    event: &'a str,
    /// Event payload
    data: &'a serde_json::Value,
}

/// Redis Pub/Sub room sink
#[derive(Clone)]
pub struct RedisRoomSink {
    pool: RedisPool,
}

impl RedisRoomSink {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Channel name for a logical room
    fn channel(room: &str) -> String {
        format!("{ROOM_CHANNEL_PREFIX}{room}")
    }
}

#[async_trait]
impl RoomSink for RedisRoomSink {
    async fn emit_to_room(
        &self,
        room: &str,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<(), SinkError> {
        let message = serde_json::to_string(&RoomMessage {
            event,
            data: payload,
        })
        .map_err(|e| SinkError(e.to_string()))?;

        let channel = Self::channel(room);
        let receivers = self
            .pool
            .publish(&channel, &message)
            .await
            .map_err(|e| SinkError(e.to_string()))?;

        tracing::debug!(
            channel = %channel,
            event = %event,
            receivers = receivers,
            "Published room event"
        );

        Ok(())
    }
}
