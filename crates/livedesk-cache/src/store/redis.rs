//! Redis-backed presence store.
//!
//! Key layout:
//! - `presence:{kind}:{id}` - the JSON presence record, record TTL
//! - `typing:{chat}:{kind}:{id}` - typing flag, short TTL
//! - `presence_online` / `presence_chatting` - sets of user references
//!   maintained on every status write, so sweep listings stay O(set)
//!
//! TTLs make stale entries self-expire even if the sweep fails; the record
//! TTL must exceed the sweep cadence by a safe margin.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::time::Duration as StdDuration;

use livedesk_core::{
    ChatId, PresenceRecord, PresenceStatus, PresenceStore, StoreError, StoreResult, TenantId,
    UserRef,
};

use crate::pool::{RedisPool, RedisPoolError};

/// Key prefix for presence records
const PRESENCE_PREFIX: &str = "presence:";
/// Key prefix for typing indicators
const TYPING_PREFIX: &str = "typing:";
/// Set of users with status in {online, away, chatting}
const ONLINE_SET: &str = "presence_online";
/// Set of users with status chatting
const CHATTING_SET: &str = "presence_chatting";

/// Presence record TTL (24 hours - refreshed by heartbeat/activity)
const DEFAULT_RECORD_TTL: u64 = 86_400;
/// Typing indicator TTL (10 seconds)
const DEFAULT_TYPING_TTL: u64 = 10;

impl From<RedisPoolError> for StoreError {
    fn from(e: RedisPoolError) -> Self {
        match e {
            RedisPoolError::Serialization(e) => Self::Serialization(e.to_string()),
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Redis implementation of the presence store
#[derive(Clone)]
pub struct RedisPresenceStore {
    pool: RedisPool,
    record_ttl: u64,
    typing_ttl: u64,
}

impl RedisPresenceStore {
    /// Create a store with default TTLs
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            record_ttl: DEFAULT_RECORD_TTL,
            typing_ttl: DEFAULT_TYPING_TTL,
        }
    }

    /// Create a store with TTLs from configuration
    #[must_use]
    pub fn from_config(pool: RedisPool, config: &livedesk_common::PresenceConfig) -> Self {
        Self {
            pool,
            record_ttl: config.record_ttl_secs,
            typing_ttl: config.typing_ttl_secs,
        }
    }

    /// Generate Redis key for a presence record
    fn presence_key(user: &UserRef) -> String {
        format!("{PRESENCE_PREFIX}{user}")
    }

    /// Generate Redis key for a typing indicator
    fn typing_key(chat: ChatId, user: &UserRef) -> String {
        format!("{TYPING_PREFIX}{chat}:{user}")
    }

    async fn load(&self, user: &UserRef) -> StoreResult<Option<PresenceRecord>> {
        Ok(self.pool.get_value(&Self::presence_key(user)).await?)
    }

    async fn save(&self, record: &PresenceRecord) -> StoreResult<()> {
        let key = Self::presence_key(&record.user);
        self.pool.set(&key, record, Some(self.record_ttl)).await?;
        Ok(())
    }

    async fn load_or_new(&self, user: &UserRef, at: DateTime<Utc>) -> StoreResult<PresenceRecord> {
        Ok(self
            .load(user)
            .await?
            .unwrap_or_else(|| PresenceRecord::new(*user, at)))
    }

    /// Keep the online/chatting sets in sync with a status write
    async fn sync_listings(&self, user: &UserRef, status: PresenceStatus) -> StoreResult<()> {
        let member = user.to_string();

        if status.is_connected() {
            self.pool.sadd(ONLINE_SET, &member).await?;
        } else {
            self.pool.srem(ONLINE_SET, &member).await?;
        }

        if status == PresenceStatus::Chatting {
            self.pool.sadd(CHATTING_SET, &member).await?;
        } else {
            self.pool.srem(CHATTING_SET, &member).await?;
        }

        Ok(())
    }

    /// Parse set members, skipping anything that is not a user reference
    fn parse_members(members: Vec<String>) -> Vec<UserRef> {
        members
            .into_iter()
            .filter_map(|m| match m.parse::<UserRef>() {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(member = %m, error = %e, "Skipping malformed listing member");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl PresenceStore for RedisPresenceStore {
    async fn get(&self, user: &UserRef) -> StoreResult<Option<PresenceRecord>> {
        self.load(user).await
    }

    async fn get_status(&self, user: &UserRef) -> StoreResult<PresenceStatus> {
        Ok(self
            .load(user)
            .await?
            .map(|r| r.status)
            .unwrap_or_default())
    }

    async fn set_status(
        &self,
        user: &UserRef,
        status: PresenceStatus,
    ) -> StoreResult<PresenceStatus> {
        let mut record = self.load_or_new(user, Utc::now()).await?;
        let previous = record.status;
        record.status = status;
        self.save(&record).await?;
        self.sync_listings(user, status).await?;

        tracing::debug!(user = %user, previous = %previous, status = %status, "Set presence status");

        Ok(previous)
    }

    async fn update_heartbeat(
        &self,
        user: &UserRef,
        tenant: Option<TenantId>,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut record = self.load_or_new(user, at).await?;
        if tenant.is_some() {
            record.tenant_id = tenant;
        }
        record.record_heartbeat(at);
        // Saved even on a stale timestamp: the write refreshes the TTL
        self.save(&record).await
    }

    async fn update_activity(&self, user: &UserRef, at: DateTime<Utc>) -> StoreResult<()> {
        let mut record = self.load_or_new(user, at).await?;
        record.record_activity(at);
        self.save(&record).await
    }

    async fn is_active(&self, user: &UserRef, timeout: Duration) -> StoreResult<bool> {
        Ok(self
            .load(user)
            .await?
            .is_some_and(|r| r.is_active(Utc::now(), timeout)))
    }

    async fn set_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<()> {
        let key = Self::typing_key(chat, user);
        self.pool.set(&key, &1u8, Some(self.typing_ttl)).await?;

        tracing::trace!(user = %user, chat = %chat, "Set typing indicator");

        Ok(())
    }

    async fn clear_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<bool> {
        let key = Self::typing_key(chat, user);
        Ok(self.pool.delete(&key).await?)
    }

    async fn is_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<bool> {
        let key = Self::typing_key(chat, user);
        Ok(self.pool.exists(&key).await?)
    }

    async fn typing_users(&self, chat: ChatId) -> StoreResult<Vec<UserRef>> {
        let prefix = format!("{TYPING_PREFIX}{chat}:");
        let keys = self.pool.scan_keys(&format!("{prefix}*"), 100).await?;

        let refs = keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&prefix).map(String::from))
            .collect();
        Ok(Self::parse_members(refs))
    }

    async fn list_online(&self) -> StoreResult<Vec<UserRef>> {
        let members = self.pool.smembers(ONLINE_SET).await?;
        Ok(Self::parse_members(members))
    }

    async fn list_chatting(&self) -> StoreResult<Vec<UserRef>> {
        let members = self.pool.smembers(CHATTING_SET).await?;
        Ok(Self::parse_members(members))
    }

    async fn has_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.pool.exists(key).await?)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: StdDuration) -> StoreResult<()> {
        self.pool.set(key, &value, Some(ttl.as_secs())).await?;
        Ok(())
    }
}
