//! Presence store contract.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::time::Duration as StdDuration;

use crate::entities::PresenceRecord;
use crate::error::StoreResult;
use crate::value_objects::{ChatId, PresenceStatus, TenantId, UserRef};

/// Key-value presence state, shared by every connection's heartbeat writer,
/// the explicit status/typing mutators, and the sweeper's reader.
///
/// Writes are per-key atomic (last-write-wins per user is acceptable; there
/// is no cross-key transaction requirement). Listings may reflect a
/// slightly stale snapshot; the periodic sweep self-corrects. This
/// component never publishes events - it is pure state.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// Full record for a user, if one exists
    async fn get(&self, user: &UserRef) -> StoreResult<Option<PresenceRecord>>;

    /// Current status; absence is a valid, cheap `Offline`, not an error
    async fn get_status(&self, user: &UserRef) -> StoreResult<PresenceStatus>;

    /// Unconditional status write; lazily creates the record and keeps the
    /// online/chatting listings in sync. Returns the previous status.
    async fn set_status(
        &self,
        user: &UserRef,
        status: PresenceStatus,
    ) -> StoreResult<PresenceStatus>;

    /// Monotonic connectivity-signal write; lazily creates the record.
    /// A timestamp older than the stored one is a no-op. The tenant is
    /// recorded when provided.
    async fn update_heartbeat(
        &self,
        user: &UserRef,
        tenant: Option<TenantId>,
        at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Monotonic genuine-interaction write; lazily creates the record
    async fn update_activity(&self, user: &UserRef, at: DateTime<Utc>) -> StoreResult<()>;

    /// Whether the last heartbeat is more recent than `timeout`
    async fn is_active(&self, user: &UserRef, timeout: Duration) -> StoreResult<bool>;

    /// Mark the user as typing in a chat; the membership carries its own
    /// short TTL and expires independently of status
    async fn set_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<()>;

    /// Clear a typing membership; returns whether one was present
    async fn clear_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<bool>;

    async fn is_typing(&self, user: &UserRef, chat: ChatId) -> StoreResult<bool>;

    /// Users currently marked typing in a chat
    async fn typing_users(&self, chat: ChatId) -> StoreResult<Vec<UserRef>>;

    /// Users with status in {Online, Away, Chatting}; scanned on every
    /// sweep tick, so must not lock writers for the duration
    async fn list_online(&self) -> StoreResult<Vec<UserRef>>;

    /// Users currently marked `Chatting`
    async fn list_chatting(&self) -> StoreResult<Vec<UserRef>>;

    /// Generic key check, exposed for collaborators' idempotency needs
    async fn has_key(&self, key: &str) -> StoreResult<bool>;

    /// Generic expiring write, same storage contract as above
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: StdDuration) -> StoreResult<()>;
}
