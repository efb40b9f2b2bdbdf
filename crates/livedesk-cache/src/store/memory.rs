//! In-memory presence store.
//!
//! Same contract as the Redis store, backed by `DashMap`. Used by tests and
//! by partial deployments that run without Redis. Typing memberships and
//! generic keys expire against `Instant` deadlines checked on read.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::time::{Duration as StdDuration, Instant};

use livedesk_core::{
    ChatId, PresenceRecord, PresenceStatus, PresenceStore, StoreResult, TenantId, UserRef,
};

/// Typing indicator TTL (10 seconds)
const DEFAULT_TYPING_TTL: StdDuration = StdDuration::from_secs(10);

/// DashMap-backed implementation of the presence store
pub struct MemoryPresenceStore {
    records: DashMap<UserRef, PresenceRecord>,
    typing: DashMap<(ChatId, UserRef), Instant>,
    kv: DashMap<String, (String, Instant)>,
    typing_ttl: StdDuration,
}

impl Default for MemoryPresenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPresenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            typing: DashMap::new(),
            kv: DashMap::new(),
            typing_ttl: DEFAULT_TYPING_TTL,
        }
    }

    /// Override the typing TTL (mainly useful in tests)
    #[must_use]
    pub fn with_typing_ttl(mut self, ttl: StdDuration) -> Self {
        self.typing_ttl = ttl;
        self
    }

    // Copy the deadline out before acting: removing while a shard read
    // guard is alive would deadlock.
    fn typing_deadline(&self, chat: ChatId, user: &UserRef) -> Option<Instant> {
        self.typing.get(&(chat, *user)).map(|d| *d)
    }

    fn with_record<F>(&self, user: &UserRef, at: DateTime<Utc>, mutate: F)
    where
        F: FnOnce(&mut PresenceRecord),
    {
        let mut entry = self
            .records
            .entry(*user)
            .or_insert_with(|| PresenceRecord::new(*user, at));
        mutate(entry.value_mut());
    }
}

#[async_trait]
impl PresenceStore for MemoryPresenceStore {
    async fn get(&self, user: &UserRef) -> StoreResult<Option<PresenceRecord>> {
        Ok(self.records.get(user).map(|r| r.value().clone()))
    }

    async fn get_status(&self, user: &UserRef) -> StoreResult<PresenceStatus> {
        Ok(self
            .records
            .get(user)
            .map(|r| r.status)
            .unwrap_or_default())
    }

    async fn set_status(
        &self,
        user: &UserRef,
        status: PresenceStatus,
    ) -> StoreResult<PresenceStatus> {
        let mut previous = PresenceStatus::default();
        self.with_record(user, Utc::now(), |record| {
            previous = record.status;
            record.status = status;
        });
        Ok(previous)
    }

    async fn update_heartbeat(
        &self,
        user: &UserRef,
        tenant: Option<TenantId>,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.with_record(user, at, |record| {
            if tenant.is_some() {
                record.tenant_id = tenant;
            }
            record.record_heartbeat(at);
        });
        Ok(())
    }

    async fn update_activity(&self, user: &UserRef, at: DateTime<Utc>) -> StoreResult<()> {
        self.with_record(user, at, |record| {
            record.record_activity(at);
        });
        Ok(())
    }

    async fn is_active(&self, user: &UserRef, timeout: Duration) -> StoreResult<bool> {
        Ok(self
            .records
            .get(user)
            .is_some_and(|r| r.is_active(Utc::now(), timeout)))
    }

    async fn set_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<()> {
        self.typing
            .insert((chat, *user), Instant::now() + self.typing_ttl);
        Ok(())
    }

    async fn clear_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<bool> {
        Ok(self.typing.remove(&(chat, *user)).is_some())
    }

    async fn is_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<bool> {
        match self.typing_deadline(chat, user) {
            Some(deadline) if deadline > Instant::now() => Ok(true),
            Some(_) => {
                self.typing.remove(&(chat, *user));
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn typing_users(&self, chat: ChatId) -> StoreResult<Vec<UserRef>> {
        let now = Instant::now();
        Ok(self
            .typing
            .iter()
            .filter(|entry| entry.key().0 == chat && *entry.value() > now)
            .map(|entry| entry.key().1)
            .collect())
    }

    async fn list_online(&self) -> StoreResult<Vec<UserRef>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.value().status.is_connected())
            .map(|entry| *entry.key())
            .collect())
    }

    async fn list_chatting(&self) -> StoreResult<Vec<UserRef>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.value().status == PresenceStatus::Chatting)
            .map(|entry| *entry.key())
            .collect())
    }

    async fn has_key(&self, key: &str) -> StoreResult<bool> {
        let deadline = self.kv.get(key).map(|entry| entry.value().1);
        match deadline {
            Some(deadline) if deadline > Instant::now() => Ok(true),
            Some(_) => {
                self.kv.remove(key);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: StdDuration) -> StoreResult<()> {
        self.kv
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livedesk_core::UserId;

    fn visitor() -> UserRef {
        UserRef::visitor(UserId::random())
    }

    #[tokio::test]
    async fn test_absent_record_reads_offline() {
        let store = MemoryPresenceStore::new();
        let user = visitor();

        assert_eq!(
            store.get_status(&user).await.unwrap(),
            PresenceStatus::Offline
        );
        assert!(store.get(&user).await.unwrap().is_none());
        assert!(!store.is_active(&user, Duration::minutes(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_status_returns_previous() {
        let store = MemoryPresenceStore::new();
        let user = visitor();

        let previous = store
            .set_status(&user, PresenceStatus::Online)
            .await
            .unwrap();
        assert_eq!(previous, PresenceStatus::Offline);

        let previous = store.set_status(&user, PresenceStatus::Away).await.unwrap();
        assert_eq!(previous, PresenceStatus::Online);
    }

    #[tokio::test]
    async fn test_heartbeat_is_monotonic() {
        let store = MemoryPresenceStore::new();
        let user = visitor();
        let now = Utc::now();

        store.update_heartbeat(&user, None, now).await.unwrap();
        store
            .update_heartbeat(&user, None, now - Duration::minutes(1))
            .await
            .unwrap();

        let record = store.get(&user).await.unwrap().unwrap();
        assert_eq!(record.last_heartbeat_at, now);
    }

    #[tokio::test]
    async fn test_heartbeat_records_tenant_once_known() {
        let store = MemoryPresenceStore::new();
        let user = visitor();
        let tenant = livedesk_core::TenantId::random();

        store.update_heartbeat(&user, None, Utc::now()).await.unwrap();
        assert!(store.get(&user).await.unwrap().unwrap().tenant_id.is_none());

        store
            .update_heartbeat(&user, Some(tenant), Utc::now())
            .await
            .unwrap();
        assert_eq!(
            store.get(&user).await.unwrap().unwrap().tenant_id,
            Some(tenant)
        );
    }

    #[tokio::test]
    async fn test_typing_round_trip() {
        let store = MemoryPresenceStore::new();
        let user = visitor();
        let chat = ChatId::random();

        assert!(!store.is_typing(&user, chat).await.unwrap());

        store.set_typing(&user, chat).await.unwrap();
        assert!(store.is_typing(&user, chat).await.unwrap());
        assert_eq!(store.typing_users(chat).await.unwrap(), vec![user]);

        assert!(store.clear_typing(&user, chat).await.unwrap());
        assert!(!store.is_typing(&user, chat).await.unwrap());
    }

    #[tokio::test]
    async fn test_typing_expires() {
        let store = MemoryPresenceStore::new().with_typing_ttl(StdDuration::from_millis(20));
        let user = visitor();
        let chat = ChatId::random();

        store.set_typing(&user, chat).await.unwrap();
        tokio::time::sleep(StdDuration::from_millis(40)).await;

        assert!(!store.is_typing(&user, chat).await.unwrap());
        assert!(store.typing_users(chat).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listings_follow_status() {
        let store = MemoryPresenceStore::new();
        let online = visitor();
        let chatting = UserRef::commercial(UserId::random());
        let offline = visitor();

        store.set_status(&online, PresenceStatus::Online).await.unwrap();
        store
            .set_status(&chatting, PresenceStatus::Chatting)
            .await
            .unwrap();
        store
            .set_status(&offline, PresenceStatus::Offline)
            .await
            .unwrap();

        let listed = store.list_online().await.unwrap();
        assert!(listed.contains(&online));
        assert!(listed.contains(&chatting));
        assert!(!listed.contains(&offline));

        assert_eq!(store.list_chatting().await.unwrap(), vec![chatting]);
    }

    #[tokio::test]
    async fn test_generic_keys_expire() {
        let store = MemoryPresenceStore::new();

        store
            .set_with_expiry("dedup:abc", "1", StdDuration::from_millis(20))
            .await
            .unwrap();
        assert!(store.has_key("dedup:abc").await.unwrap());

        tokio::time::sleep(StdDuration::from_millis(40)).await;
        assert!(!store.has_key("dedup:abc").await.unwrap());
    }
}
