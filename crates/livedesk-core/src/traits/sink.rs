//! Room-addressed notification sink contract.

use async_trait::async_trait;

use crate::error::SinkError;

/// Fire-and-forget delivery of an event payload to one logical room.
///
/// The core never decides how a payload reaches a client socket, only which
/// rooms to address. Deployments without a transport wire in
/// [`NoopRoomSink`]; emission through it is a successful no-op.
#[async_trait]
pub trait RoomSink: Send + Sync {
    async fn emit_to_room(
        &self,
        room: &str,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<(), SinkError>;
}

/// Default sink for tests and partial deployments: accepts everything,
/// delivers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRoomSink;

#[async_trait]
impl RoomSink for NoopRoomSink {
    async fn emit_to_room(
        &self,
        _room: &str,
        _event: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), SinkError> {
        Ok(())
    }
}
