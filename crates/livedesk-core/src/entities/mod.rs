//! Domain entities - presence records and chat relationship snapshots

mod chat;
mod presence;

pub use chat::{ChatSnapshot, ChatStatus};
pub use presence::PresenceRecord;
