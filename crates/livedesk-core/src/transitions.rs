//! Time-based presence transitions.
//!
//! Pure logic: given a current status and elapsed inactivity, compute the
//! next status. Applied by the inactivity sweeper; explicit writer
//! transitions (heartbeat, disconnect, manual change) live in the service
//! layer.

use chrono::Duration;

use crate::value_objects::PresenceStatus;

/// Thresholds governing time-based transitions and the recently-closed
/// fallback window for notification fan-out.
#[derive(Debug, Clone)]
pub struct PresencePolicy {
    /// Inactivity after which a connected user is marked away
    pub away_after: Duration,
    /// Inactivity after which any user is marked offline
    pub offline_after: Duration,
    /// How long a terminal chat still counts as a relationship
    pub closed_chat_window: Duration,
}

/// Error for threshold configurations that can never fire
#[derive(Debug, thiserror::Error)]
#[error("Invalid presence policy: away_after ({away_after}) must be shorter than offline_after ({offline_after})")]
pub struct InvalidPolicy {
    pub away_after: Duration,
    pub offline_after: Duration,
}

impl PresencePolicy {
    pub fn new(
        away_after: Duration,
        offline_after: Duration,
        closed_chat_window: Duration,
    ) -> Result<Self, InvalidPolicy> {
        if away_after >= offline_after {
            return Err(InvalidPolicy {
                away_after,
                offline_after,
            });
        }
        Ok(Self {
            away_after,
            offline_after,
            closed_chat_window,
        })
    }
}

impl Default for PresencePolicy {
    fn default() -> Self {
        Self {
            away_after: Duration::minutes(5),
            offline_after: Duration::minutes(15),
            closed_chat_window: Duration::hours(24),
        }
    }
}

/// Compute the time-based next status for a user, or `None` when the sweep
/// should leave the user untouched.
///
/// - past `offline_after`, everyone goes `Offline` regardless of prior
///   status (ghost-session reclaim);
/// - between the thresholds, only `Online` and `Chatting` users drop to
///   `Away` - the sweep never re-announces an `Away` user and never
///   upgrades an `Offline` one;
/// - below `away_after` nothing changes.
#[must_use]
pub fn sweep_transition(
    current: PresenceStatus,
    inactive: Duration,
    policy: &PresencePolicy,
) -> Option<PresenceStatus> {
    if inactive >= policy.offline_after {
        if current == PresenceStatus::Offline {
            return None;
        }
        return Some(PresenceStatus::Offline);
    }

    if inactive >= policy.away_after {
        return match current {
            PresenceStatus::Online | PresenceStatus::Chatting => Some(PresenceStatus::Away),
            PresenceStatus::Away | PresenceStatus::Offline => None,
        };
    }

    None
}
