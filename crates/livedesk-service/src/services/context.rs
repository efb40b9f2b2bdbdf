//! Service context - dependency container for the presence services.

use std::sync::Arc;

use livedesk_core::{ChatRepository, NoopRoomSink, PresencePolicy, PresenceStore, RoomSink};

use crate::events::EventBus;

/// Dependency container passed to every presence service.
///
/// The chat repository and the room sink are capability interfaces: a
/// partial deployment (or a test) can hand in a no-op implementation and
/// the presence core keeps working, degrading to self-only notifications.
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn PresenceStore>,
    chat_repo: Arc<dyn ChatRepository>,
    sink: Arc<dyn RoomSink>,
    bus: EventBus,
    policy: PresencePolicy,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        store: Arc<dyn PresenceStore>,
        chat_repo: Arc<dyn ChatRepository>,
        sink: Arc<dyn RoomSink>,
        bus: EventBus,
        policy: PresencePolicy,
    ) -> Self {
        Self {
            store,
            chat_repo,
            sink,
            bus,
            policy,
        }
    }

    /// Swap the sink for the no-op implementation (partial deployments)
    #[must_use]
    pub fn without_sink(mut self) -> Self {
        self.sink = Arc::new(NoopRoomSink);
        self
    }

    /// Get the presence store
    pub fn store(&self) -> &dyn PresenceStore {
        self.store.as_ref()
    }

    /// Get the chat repository
    pub fn chat_repo(&self) -> &Arc<dyn ChatRepository> {
        &self.chat_repo
    }

    /// Get the room sink
    pub fn sink(&self) -> &Arc<dyn RoomSink> {
        &self.sink
    }

    /// Get the event bus publisher
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Get the presence policy
    pub fn policy(&self) -> &PresencePolicy {
        &self.policy
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("policy", &self.policy)
            .finish()
    }
}
