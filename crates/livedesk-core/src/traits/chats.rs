//! Chat relationship query contract.

use async_trait::async_trait;

use crate::entities::{ChatSnapshot, ChatStatus};
use crate::error::ChatQueryError;
use crate::value_objects::{UserId, UserKind};

/// Read-only access to the chat subsystem's conversations, used to scope
/// presence fan-out to actual correspondents.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Chats involving `user` (on the side given by `kind`) whose status is
    /// in `statuses`. `closed_at` is populated for terminal chats.
    async fn find_chats_by_user(
        &self,
        user: UserId,
        kind: UserKind,
        statuses: &[ChatStatus],
    ) -> Result<Vec<ChatSnapshot>, ChatQueryError>;
}
