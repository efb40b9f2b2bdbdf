//! Read-only view of chat relationships.
//!
//! Chats are owned by the chat subsystem; the presence core only reads them
//! to scope notification fan-out, and never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ChatId, TenantId, UserId};

/// Lifecycle status of a chat conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    /// Opened by a visitor, waiting for an agent
    Pending,
    /// An agent has been assigned but has not replied yet
    Assigned,
    /// Both sides are exchanging messages
    Active,
    /// Handed over to another agent
    Transferred,
    /// Ended normally
    Closed,
    /// Ended by timeout or visitor departure
    Abandoned,
}

impl ChatStatus {
    /// Statuses of chats with an ongoing relationship
    pub const LIVE: [Self; 4] = [Self::Pending, Self::Assigned, Self::Active, Self::Transferred];

    /// Terminal statuses, eligible for the recently-closed fallback
    pub const TERMINAL: [Self; 2] = [Self::Closed, Self::Abandoned];

    #[must_use]
    pub fn is_live(&self) -> bool {
        Self::LIVE.contains(self)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }
}

impl std::fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Assigned => write!(f, "assigned"),
            Self::Active => write!(f, "active"),
            Self::Transferred => write!(f, "transferred"),
            Self::Closed => write!(f, "closed"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl std::str::FromStr for ChatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "active" => Ok(Self::Active),
            "transferred" => Ok(Self::Transferred),
            "closed" => Ok(Self::Closed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(format!("Invalid chat status: {s}")),
        }
    }
}

/// A snapshot of one chat relationship, as reported by the chat subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSnapshot {
    pub chat_id: ChatId,
    pub tenant_id: Option<TenantId>,
    pub visitor_id: UserId,
    /// Assigned commercial agent, absent while the chat is still pending
    pub commercial_id: Option<UserId>,
    pub status: ChatStatus,
    /// Set once the chat reaches a terminal status
    pub closed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ChatStatus::Pending.is_live());
        assert!(ChatStatus::Transferred.is_live());
        assert!(!ChatStatus::Closed.is_live());
        assert!(ChatStatus::Closed.is_terminal());
        assert!(ChatStatus::Abandoned.is_terminal());
        assert!(!ChatStatus::Active.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for status in ChatStatus::LIVE.iter().chain(ChatStatus::TERMINAL.iter()) {
            let parsed = status.to_string().parse::<ChatStatus>().unwrap();
            assert_eq!(parsed, *status);
        }
    }
}
