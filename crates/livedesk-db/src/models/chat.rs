//! Row model for the chat subsystem's `chats` table.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use livedesk_core::{ChatId, ChatSnapshot, ChatStatus, TenantId, UserId};

/// One row of the `chats` table, as read for relationship resolution
#[derive(Debug, Clone, FromRow)]
pub struct ChatModel {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub visitor_id: Uuid,
    pub commercial_id: Option<Uuid>,
    pub status: String,
    pub closed_at: Option<DateTime<Utc>>,
}

impl ChatModel {
    /// Convert into a domain snapshot; `None` when the status column holds
    /// a value this core does not know about
    pub fn into_snapshot(self) -> Option<ChatSnapshot> {
        let status = match self.status.parse::<ChatStatus>() {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(chat_id = %self.id, error = %e, "Skipping chat with unknown status");
                return None;
            }
        };

        Some(ChatSnapshot {
            chat_id: ChatId::new(self.id),
            tenant_id: self.tenant_id.map(TenantId::new),
            visitor_id: UserId::new(self.visitor_id),
            commercial_id: self.commercial_id.map(UserId::new),
            status,
            closed_at: self.closed_at,
        })
    }
}
