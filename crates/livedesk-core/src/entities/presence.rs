//! Per-user presence record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PresenceStatus, TenantId, UserRef};

/// Presence state of one user, keyed by `(kind, id)`.
///
/// Both timestamps are monotonically non-decreasing: writers carrying an
/// older timestamp than the stored one are no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub user: UserRef,
    pub status: PresenceStatus,
    pub tenant_id: Option<TenantId>,
    /// Last connectivity signal (any client ping)
    pub last_heartbeat_at: DateTime<Utc>,
    /// Last genuine interaction, distinct from mere connectivity
    pub last_user_activity_at: DateTime<Utc>,
}

impl PresenceRecord {
    /// Create a fresh record; status starts `Offline` until a writer
    /// explicitly promotes it.
    #[must_use]
    pub fn new(user: UserRef, at: DateTime<Utc>) -> Self {
        Self {
            user,
            status: PresenceStatus::Offline,
            tenant_id: None,
            last_heartbeat_at: at,
            last_user_activity_at: at,
        }
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant_id: Option<TenantId>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// Apply a heartbeat timestamp. Returns false if the write was stale.
    pub fn record_heartbeat(&mut self, at: DateTime<Utc>) -> bool {
        if at < self.last_heartbeat_at {
            return false;
        }
        self.last_heartbeat_at = at;
        true
    }

    /// Apply a genuine-activity timestamp. Returns false if the write was stale.
    pub fn record_activity(&mut self, at: DateTime<Utc>) -> bool {
        if at < self.last_user_activity_at {
            return false;
        }
        self.last_user_activity_at = at;
        true
    }

    /// Elapsed time since the last genuine interaction
    #[must_use]
    pub fn inactive_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_user_activity_at
    }

    /// Whether the last heartbeat is more recent than `timeout`
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_heartbeat_at < timeout
    }
}
