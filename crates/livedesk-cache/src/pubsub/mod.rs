//! Redis Pub/Sub room sink

mod room_sink;

pub use room_sink::{RedisRoomSink, ROOM_CHANNEL_PREFIX};
