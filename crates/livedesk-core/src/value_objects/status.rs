//! Presence status of a tracked user.

use serde::{Deserialize, Serialize};

/// Presence status of a visitor or commercial agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Connected and recently active
    Online,
    /// Connected but inactive past the away threshold
    Away,
    /// Disconnected, timed out, or never seen
    Offline,
    /// Actively engaged in a conversation view (explicit override set by
    /// the chat subsystem, never entered by activity alone)
    Chatting,
}

impl Default for PresenceStatus {
    fn default() -> Self {
        Self::Offline
    }
}

impl PresenceStatus {
    /// Whether the user is considered reachable at all
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::Offline)
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Away => write!(f, "away"),
            Self::Offline => write!(f, "offline"),
            Self::Chatting => write!(f, "chatting"),
        }
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "away" => Ok(Self::Away),
            "offline" => Ok(Self::Offline),
            "chatting" => Ok(Self::Chatting),
            _ => Err(format!("Invalid status: {s}")),
        }
    }
}
