//! Presence service
//!
//! The explicit presence writers: heartbeats, genuine activity, typing
//! indicators, manual status changes, and disconnects. Every operation that
//! produces a status transition publishes exactly one `PresenceChanged` on
//! the event bus - the same publish path the sweeper uses.
//!
//! Store failures are logged and treated as no-ops: the periodic sweep
//! re-derives presence from elapsed inactivity, so a lost write corrects
//! itself within a tick.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use livedesk_core::{
    ChatId, PresenceChanged, PresenceStatus, TenantId, UserRef,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Presence command/query surface exposed to the transport layer
#[derive(Clone)]
pub struct PresenceService {
    ctx: Arc<ServiceContext>,
}

impl PresenceService {
    /// Create a new PresenceService
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Record a connectivity signal. Lazily creates the presence record and
    /// brings an offline user back online.
    #[instrument(skip(self))]
    pub async fn heartbeat(&self, user: &UserRef, tenant: Option<TenantId>) {
        if let Err(e) = self
            .ctx
            .store()
            .update_heartbeat(user, tenant, Utc::now())
            .await
        {
            warn!(user = %user, error = %e, "Heartbeat write failed, skipping");
            return;
        }

        match self.ctx.store().get_status(user).await {
            Ok(PresenceStatus::Offline) => {
                self.transition(user, PresenceStatus::Online).await;
            }
            Ok(_) => {}
            Err(e) => warn!(user = %user, error = %e, "Status read failed after heartbeat"),
        }
    }

    /// Record a genuine interaction. Restores `Online` for away or offline
    /// users; an explicit `Chatting` override is left untouched.
    #[instrument(skip(self))]
    pub async fn record_activity(&self, user: &UserRef) {
        if let Err(e) = self.ctx.store().update_activity(user, Utc::now()).await {
            warn!(user = %user, error = %e, "Activity write failed, skipping");
            return;
        }

        match self.ctx.store().get_status(user).await {
            Ok(PresenceStatus::Away | PresenceStatus::Offline) => {
                self.transition(user, PresenceStatus::Online).await;
            }
            Ok(_) => {}
            Err(e) => warn!(user = %user, error = %e, "Status read failed after activity"),
        }
    }

    /// Manual or administrative status change; unconditional
    #[instrument(skip(self))]
    pub async fn set_status(&self, user: &UserRef, status: PresenceStatus) {
        self.transition(user, status).await;
    }

    /// The user started typing in a chat. Counts as genuine activity.
    #[instrument(skip(self))]
    pub async fn typing_started(&self, user: &UserRef, chat: ChatId) {
        if let Err(e) = self.ctx.store().set_typing(user, chat).await {
            warn!(user = %user, chat = %chat, error = %e, "Typing write failed, skipping");
        }
        self.record_activity(user).await;
    }

    /// The user stopped typing in a chat
    #[instrument(skip(self))]
    pub async fn typing_stopped(&self, user: &UserRef, chat: ChatId) {
        if let Err(e) = self.ctx.store().clear_typing(user, chat).await {
            warn!(user = %user, chat = %chat, error = %e, "Typing clear failed, skipping");
        }
    }

    /// Explicit client disconnect
    #[instrument(skip(self))]
    pub async fn disconnect(&self, user: &UserRef) {
        self.transition(user, PresenceStatus::Offline).await;
    }

    /// Current status; absence reads as `Offline`
    pub async fn status_of(&self, user: &UserRef) -> ServiceResult<PresenceStatus> {
        Ok(self.ctx.store().get_status(user).await?)
    }

    /// Whether the last heartbeat is more recent than `timeout`
    pub async fn is_active(&self, user: &UserRef, timeout: Duration) -> ServiceResult<bool> {
        Ok(self.ctx.store().is_active(user, timeout).await?)
    }

    /// Whether the user is currently marked typing in a chat
    pub async fn is_typing(&self, user: &UserRef, chat: ChatId) -> ServiceResult<bool> {
        Ok(self.ctx.store().is_typing(user, chat).await?)
    }

    /// Users currently typing in a chat
    pub async fn typing_users(&self, chat: ChatId) -> ServiceResult<Vec<UserRef>> {
        Ok(self.ctx.store().typing_users(chat).await?)
    }

    /// Users with status in {Online, Away, Chatting}
    pub async fn online_users(&self) -> ServiceResult<Vec<UserRef>> {
        Ok(self.ctx.store().list_online().await?)
    }

    /// Users currently marked `Chatting`
    pub async fn chatting_users(&self) -> ServiceResult<Vec<UserRef>> {
        Ok(self.ctx.store().list_chatting().await?)
    }

    /// Apply a status write and publish the transition, if any
    async fn transition(&self, user: &UserRef, next: PresenceStatus) {
        let previous = match self.ctx.store().set_status(user, next).await {
            Ok(previous) => previous,
            Err(e) => {
                warn!(user = %user, status = %next, error = %e, "Status write failed, skipping");
                return;
            }
        };

        if previous == next {
            return;
        }

        let tenant_id = self.tenant_of(user).await;
        self.ctx
            .bus()
            .publish(PresenceChanged::now(*user, previous, next, tenant_id));

        info!(user = %user, previous = %previous, status = %next, "Presence updated");
    }

    async fn tenant_of(&self, user: &UserRef) -> Option<TenantId> {
        self.ctx
            .store()
            .get(user)
            .await
            .ok()
            .flatten()
            .and_then(|record| record.tenant_id)
    }
}
