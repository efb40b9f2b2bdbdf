//! # livedesk-service
//!
//! Application layer for the presence core: the explicit presence writers,
//! the periodic inactivity sweeper, the chat-relationship resolver, and the
//! presence-change notifier, glued together by a fire-and-forget event bus.

pub mod events;
pub mod services;

// Re-export commonly used types at crate root
pub use events::{EventBus, EventReceiver};
pub use services::{
    ChatRelationshipResolver, InactivitySweeper, PresenceChangeNotifier, PresenceService,
    ServiceContext, ServiceError, ServiceResult, SweepOutcome, SweepReport,
};
