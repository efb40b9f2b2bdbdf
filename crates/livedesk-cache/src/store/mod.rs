//! Presence store implementations

mod memory;
mod redis;

pub use memory::MemoryPresenceStore;
pub use redis::RedisPresenceStore;
