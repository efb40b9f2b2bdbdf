//! # livedesk-cache
//!
//! Redis caching layer for presence state and room-addressed notification
//! delivery, plus an in-memory store for tests and partial deployments.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Presence**: status, heartbeat/activity timestamps, typing
//!   indicators, online/chatting listings - all with TTLs
//! - **Room sink**: presence payload distribution over Redis Pub/Sub

pub mod pool;
pub mod pubsub;
pub mod store;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export store implementations
pub use store::{MemoryPresenceStore, RedisPresenceStore};

// Re-export pubsub types
pub use pubsub::{RedisRoomSink, ROOM_CHANNEL_PREFIX};
