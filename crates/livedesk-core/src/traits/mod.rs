//! Capability traits (ports) - interfaces to the presence store and to the
//! external collaborators this core consumes.
//!
//! The domain layer defines what it needs; the infrastructure crates
//! provide the implementations.

mod chats;
mod sink;
mod store;

pub use chats::ChatRepository;
pub use sink::{NoopRoomSink, RoomSink};
pub use store::PresenceStore;
