//! Chat relationship resolver
//!
//! Turns a presence subject into the set of counterparts that should hear
//! about its status changes: everyone with a live chat, or - when nothing
//! is live - whoever the subject talked to in a recently closed one, so a
//! closing interaction still reaches the last correspondent.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{instrument, warn};

use chrono::{Duration, Utc};

use livedesk_core::{
    ChatQueryError, ChatRepository, ChatSnapshot, ChatStatus, UserKind, UserRef,
};

use super::context::ServiceContext;

/// Resolves the counterparts of a user's active (or very recently closed)
/// chats
#[derive(Clone)]
pub struct ChatRelationshipResolver {
    chats: Arc<dyn ChatRepository>,
    closed_chat_window: Duration,
}

impl ChatRelationshipResolver {
    pub fn new(chats: Arc<dyn ChatRepository>, closed_chat_window: Duration) -> Self {
        Self {
            chats,
            closed_chat_window,
        }
    }

    pub fn from_context(ctx: &ServiceContext) -> Self {
        Self::new(Arc::clone(ctx.chat_repo()), ctx.policy().closed_chat_window)
    }

    /// Distinct counterparts the user currently has a chat relationship
    /// with. Query failures degrade to the empty set - the presence update
    /// itself must never fail because relationship data is unavailable.
    #[instrument(skip(self))]
    pub async fn active_counterparts(&self, user: &UserRef) -> HashSet<UserRef> {
        match self.resolve(user).await {
            Ok(counterparts) => counterparts,
            Err(e) => {
                warn!(user = %user, error = %e, "Relationship lookup failed, degrading to self-only");
                HashSet::new()
            }
        }
    }

    async fn resolve(&self, user: &UserRef) -> Result<HashSet<UserRef>, ChatQueryError> {
        let live = self
            .chats
            .find_chats_by_user(user.id, user.kind, &ChatStatus::LIVE)
            .await?;

        if !live.is_empty() {
            return Ok(Self::counterparts(user.kind, &live));
        }

        // Nothing live: fall back to chats closed inside the recency window
        let terminal = self
            .chats
            .find_chats_by_user(user.id, user.kind, &ChatStatus::TERMINAL)
            .await?;

        let cutoff = Utc::now() - self.closed_chat_window;
        let recent: Vec<ChatSnapshot> = terminal
            .into_iter()
            .filter(|chat| chat.closed_at.is_some_and(|closed| closed >= cutoff))
            .collect();

        Ok(Self::counterparts(user.kind, &recent))
    }

    /// Extract the other side of each chat, deduplicated
    fn counterparts(kind: UserKind, chats: &[ChatSnapshot]) -> HashSet<UserRef> {
        chats
            .iter()
            .filter_map(|chat| match kind {
                UserKind::Visitor => chat.commercial_id.map(UserRef::commercial),
                UserKind::Commercial => Some(UserRef::visitor(chat.visitor_id)),
            })
            .collect()
    }
}
