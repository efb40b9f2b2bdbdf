//! Inactivity sweeper
//!
//! Periodic reconciliation loop: scans every user currently believed
//! connected, re-derives their status from elapsed inactivity, and
//! publishes the same `PresenceChanged` events a direct status write would.
//! Detects ghost sessions whose client never sent a disconnect.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use livedesk_core::{sweep_transition, PresenceChanged, PresenceStatus, UserRef};

use super::context::ServiceContext;

/// Result of one sweep trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The tick ran to completion
    Completed(SweepReport),
    /// Another sweep was already running; this trigger did nothing
    Skipped,
}

/// Aggregated counts of one completed sweep tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Users scanned from the online listing
    pub scanned: usize,
    /// Users downgraded to `Away`
    pub moved_to_away: usize,
    /// Users downgraded to `Offline`
    pub moved_to_offline: usize,
    /// Users skipped over a missing record or a per-user store error
    pub skipped: usize,
}

/// Per-user reconciliation result
enum UserSweep {
    Unchanged,
    Moved(PresenceStatus),
    Skipped,
}

/// Periodic inactivity reconciliation with a single-flight guard
pub struct InactivitySweeper {
    ctx: Arc<ServiceContext>,
    running: AtomicBool,
}

impl InactivitySweeper {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            running: AtomicBool::new(false),
        }
    }

    /// Spawn the periodic loop. The cadence must stay well below the away
    /// threshold so both thresholds are actually observable.
    pub fn start(self: Arc<Self>, period: std::time::Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                self.sweep_once().await;
            }
        })
    }

    /// Whether a sweep tick is currently executing
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run one sweep tick, unless one is already running.
    ///
    /// Concurrent triggers are dropped, never queued - the next scheduled
    /// tick catches up.
    pub async fn sweep_once(&self) -> SweepOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Sweep already running, skipping trigger");
            return SweepOutcome::Skipped;
        }

        let started = Instant::now();
        let report = self.reconcile_all().await;
        self.running.store(false, Ordering::SeqCst);

        info!(
            scanned = report.scanned,
            moved_to_away = report.moved_to_away,
            moved_to_offline = report.moved_to_offline,
            skipped = report.skipped,
            duration_ms = started.elapsed().as_millis() as u64,
            "Inactivity sweep completed"
        );

        SweepOutcome::Completed(report)
    }

    #[instrument(skip(self))]
    async fn reconcile_all(&self) -> SweepReport {
        let users = match self.ctx.store().list_online().await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "Online listing failed, sweep tick is a no-op");
                return SweepReport::default();
            }
        };

        let now = Utc::now();
        let mut report = SweepReport::default();

        for user in users {
            report.scanned += 1;
            match self.reconcile_user(&user, now).await {
                UserSweep::Moved(PresenceStatus::Away) => report.moved_to_away += 1,
                UserSweep::Moved(PresenceStatus::Offline) => report.moved_to_offline += 1,
                UserSweep::Moved(_) | UserSweep::Unchanged => {}
                UserSweep::Skipped => report.skipped += 1,
            }
        }

        report
    }

    /// Reconcile one user; failures skip the user, never the batch
    async fn reconcile_user(&self, user: &UserRef, now: DateTime<Utc>) -> UserSweep {
        let record = match self.ctx.store().get(user).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(user = %user, "Listed user has no presence record, skipping");
                return UserSweep::Skipped;
            }
            Err(e) => {
                warn!(user = %user, error = %e, "Presence read failed, skipping user");
                return UserSweep::Skipped;
            }
        };

        let inactive = record.inactive_for(now);
        let Some(next) = sweep_transition(record.status, inactive, self.ctx.policy()) else {
            return UserSweep::Unchanged;
        };

        let previous = match self.ctx.store().set_status(user, next).await {
            Ok(previous) => previous,
            Err(e) => {
                warn!(user = %user, status = %next, error = %e, "Status write failed, skipping user");
                return UserSweep::Skipped;
            }
        };

        self.ctx.bus().publish(PresenceChanged {
            user: *user,
            previous,
            new: next,
            tenant_id: record.tenant_id,
            at: now,
        });

        debug!(user = %user, previous = %previous, status = %next, inactive_secs = inactive.num_seconds(), "Sweep transition");

        UserSweep::Moved(next)
    }
}
