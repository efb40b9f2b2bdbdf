//! PostgreSQL implementation of ChatRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use livedesk_core::{ChatQueryError, ChatRepository, ChatSnapshot, ChatStatus, UserId, UserKind};

use crate::models::ChatModel;

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// Create a new PgChatRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self))]
    async fn find_chats_by_user(
        &self,
        user: UserId,
        kind: UserKind,
        statuses: &[ChatStatus],
    ) -> Result<Vec<ChatSnapshot>, ChatQueryError> {
        let statuses: Vec<String> = statuses.iter().map(ToString::to_string).collect();

        let query = match kind {
            UserKind::Visitor => {
                r"
                SELECT id, tenant_id, visitor_id, commercial_id, status, closed_at
                FROM chats
                WHERE visitor_id = $1 AND status = ANY($2)
                "
            }
            UserKind::Commercial => {
                r"
                SELECT id, tenant_id, visitor_id, commercial_id, status, closed_at
                FROM chats
                WHERE commercial_id = $1 AND status = ANY($2)
                "
            }
        };

        let rows = sqlx::query_as::<_, ChatModel>(query)
            .bind(user.into_inner())
            .bind(&statuses)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ChatQueryError(e.to_string()))?;

        Ok(rows.into_iter().filter_map(ChatModel::into_snapshot).collect())
    }
}
