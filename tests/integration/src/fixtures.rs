//! Test fixtures: in-process fakes for the external collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Notify;

use livedesk_cache::MemoryPresenceStore;
use livedesk_core::{
    ChatId, ChatQueryError, ChatRepository, ChatSnapshot, ChatStatus, PresencePolicy,
    PresenceRecord, PresenceStatus, PresenceStore, RoomSink, SinkError, StoreResult, TenantId,
    UserId, UserRef,
};
use livedesk_service::{EventBus, EventReceiver, ServiceContext};

/// Chat repository serving a configurable set of snapshots
#[derive(Default)]
pub struct FakeChatRepository {
    chats: Mutex<Vec<ChatSnapshot>>,
}

impl FakeChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, chat: ChatSnapshot) {
        self.chats.lock().unwrap().push(chat);
    }
}

#[async_trait]
impl ChatRepository for FakeChatRepository {
    async fn find_chats_by_user(
        &self,
        user: UserId,
        kind: livedesk_core::UserKind,
        statuses: &[ChatStatus],
    ) -> Result<Vec<ChatSnapshot>, ChatQueryError> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .iter()
            .filter(|chat| {
                let side = match kind {
                    livedesk_core::UserKind::Visitor => chat.visitor_id == user,
                    livedesk_core::UserKind::Commercial => chat.commercial_id == Some(user),
                };
                side && statuses.contains(&chat.status)
            })
            .cloned()
            .collect())
    }
}

/// One recorded emission
#[derive(Debug, Clone)]
pub struct Emission {
    pub room: String,
    pub event: String,
    pub payload: serde_json::Value,
}

/// Sink recording every emission for later assertions
#[derive(Default)]
pub struct RecordingSink {
    emissions: Mutex<Vec<Emission>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().unwrap().clone()
    }

    pub fn rooms(&self) -> Vec<String> {
        self.emissions().into_iter().map(|e| e.room).collect()
    }

    /// Poll until at least `count` emissions were recorded
    ///
    /// # Panics
    /// Panics after ~2 seconds without reaching the count.
    pub async fn wait_for(&self, count: usize) -> Vec<Emission> {
        for _ in 0..200 {
            let emissions = self.emissions();
            if emissions.len() >= count {
                return emissions;
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
        panic!(
            "expected {count} emissions, got {}",
            self.emissions().len()
        );
    }
}

#[async_trait]
impl RoomSink for RecordingSink {
    async fn emit_to_room(
        &self,
        room: &str,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<(), SinkError> {
        self.emissions.lock().unwrap().push(Emission {
            room: room.to_string(),
            event: event.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

/// Presence store whose online listing blocks until released, to pin a
/// sweep tick in its running state deterministically.
pub struct GatedStore {
    inner: MemoryPresenceStore,
    gate: Notify,
    list_calls: AtomicUsize,
}

impl GatedStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryPresenceStore::new(),
            gate: Notify::new(),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Release one blocked `list_online` call
    pub fn open_gate(&self) {
        self.gate.notify_one();
    }

    /// How many times the online listing was scanned
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryPresenceStore {
        &self.inner
    }
}

impl Default for GatedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresenceStore for GatedStore {
    async fn get(&self, user: &UserRef) -> StoreResult<Option<PresenceRecord>> {
        self.inner.get(user).await
    }

    async fn get_status(&self, user: &UserRef) -> StoreResult<PresenceStatus> {
        self.inner.get_status(user).await
    }

    async fn set_status(
        &self,
        user: &UserRef,
        status: PresenceStatus,
    ) -> StoreResult<PresenceStatus> {
        self.inner.set_status(user, status).await
    }

    async fn update_heartbeat(
        &self,
        user: &UserRef,
        tenant: Option<TenantId>,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.inner.update_heartbeat(user, tenant, at).await
    }

    async fn update_activity(&self, user: &UserRef, at: DateTime<Utc>) -> StoreResult<()> {
        self.inner.update_activity(user, at).await
    }

    async fn is_active(&self, user: &UserRef, timeout: Duration) -> StoreResult<bool> {
        self.inner.is_active(user, timeout).await
    }

    async fn set_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<()> {
        self.inner.set_typing(user, chat).await
    }

    async fn clear_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<bool> {
        self.inner.clear_typing(user, chat).await
    }

    async fn is_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<bool> {
        self.inner.is_typing(user, chat).await
    }

    async fn typing_users(&self, chat: ChatId) -> StoreResult<Vec<UserRef>> {
        self.inner.typing_users(chat).await
    }

    async fn list_online(&self) -> StoreResult<Vec<UserRef>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        self.inner.list_online().await
    }

    async fn list_chatting(&self) -> StoreResult<Vec<UserRef>> {
        self.inner.list_chatting().await
    }

    async fn has_key(&self, key: &str) -> StoreResult<bool> {
        self.inner.has_key(key).await
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: StdDuration) -> StoreResult<()> {
        self.inner.set_with_expiry(key, value, ttl).await
    }
}

/// Build a service context over the given fakes, returning the consumer
/// half of the event bus alongside it
pub fn test_context(
    store: Arc<dyn PresenceStore>,
    chats: Arc<FakeChatRepository>,
    sink: Arc<RecordingSink>,
) -> (Arc<ServiceContext>, EventReceiver) {
    let (bus, receiver) = EventBus::channel();
    let ctx = Arc::new(ServiceContext::new(
        store,
        chats,
        sink,
        bus,
        PresencePolicy::default(),
    ));
    (ctx, receiver)
}

/// An active chat between a visitor and a commercial agent
pub fn active_chat(visitor: UserId, commercial: UserId) -> ChatSnapshot {
    ChatSnapshot {
        chat_id: ChatId::random(),
        tenant_id: None,
        visitor_id: visitor,
        commercial_id: Some(commercial),
        status: ChatStatus::Active,
        closed_at: None,
    }
}

/// A chat closed `ago` in the past
pub fn closed_chat(visitor: UserId, commercial: UserId, ago: Duration) -> ChatSnapshot {
    ChatSnapshot {
        chat_id: ChatId::random(),
        tenant_id: None,
        visitor_id: visitor,
        commercial_id: Some(commercial),
        status: ChatStatus::Closed,
        closed_at: Some(Utc::now() - ago),
    }
}
