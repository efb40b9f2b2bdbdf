//! Presence change event.
//!
//! The only event this core produces. Emitted once per status transition,
//! whether the transition came from an explicit writer or from the
//! inactivity sweep, and consumed by the notifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::value_objects::{PresenceStatus, TenantId, UserRef};

/// Event name used on the wire for presence updates
pub const PRESENCE_UPDATE: &str = "PRESENCE_UPDATE";

/// A user's presence status changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceChanged {
    pub user: UserRef,
    pub previous: PresenceStatus,
    pub new: PresenceStatus,
    pub tenant_id: Option<TenantId>,
    pub at: DateTime<Utc>,
}

impl PresenceChanged {
    /// Create an event stamped with the current time
    #[must_use]
    pub fn now(
        user: UserRef,
        previous: PresenceStatus,
        new: PresenceStatus,
        tenant_id: Option<TenantId>,
    ) -> Self {
        Self {
            user,
            previous,
            new,
            tenant_id,
            at: Utc::now(),
        }
    }

    /// Room payload sent to the subject and each counterpart
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "user_id": self.user.id.to_string(),
            "user_type": self.user.kind.to_string(),
            "previous_status": self.previous.to_string(),
            "new_status": self.new.to_string(),
            "tenant_id": self.tenant_id.map(|t| t.to_string()),
            "timestamp": self.at,
        })
    }
}
