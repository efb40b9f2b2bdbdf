//! End-to-end presence flow tests: writers, sweeper, bus, notifier, and
//! fan-out over in-process fakes.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use integration_tests::fixtures::{
    active_chat, closed_chat, test_context, FakeChatRepository, GatedStore, RecordingSink,
};
use livedesk_cache::MemoryPresenceStore;
use livedesk_core::{
    PresenceStatus, PresenceStore, UserId, UserRef, PRESENCE_UPDATE,
};
use livedesk_service::{
    InactivitySweeper, PresenceChangeNotifier, PresenceService, SweepOutcome, SweepReport,
};

/// Seed a user with old heartbeat/activity timestamps and a status
async fn seed_stale(
    store: &dyn PresenceStore,
    user: &UserRef,
    status: PresenceStatus,
    inactive: Duration,
) {
    let at = Utc::now() - inactive;
    store.update_activity(user, at).await.unwrap();
    store.set_status(user, status).await.unwrap();
}

#[tokio::test]
async fn sweep_transition_fans_out_to_active_counterpart() {
    let store = Arc::new(MemoryPresenceStore::new());
    let chats = Arc::new(FakeChatRepository::new());
    let sink = Arc::new(RecordingSink::new());

    let visitor_id = UserId::random();
    let commercial_id = UserId::random();
    let visitor = UserRef::visitor(visitor_id);
    chats.push(active_chat(visitor_id, commercial_id));

    let (ctx, receiver) = test_context(store.clone(), chats, sink.clone());
    let notifier = Arc::new(PresenceChangeNotifier::from_context(&ctx));
    let notifier_task = notifier.start(receiver);

    // Online since T, silent for 20 minutes: the sweep must force offline
    seed_stale(
        ctx.store(),
        &visitor,
        PresenceStatus::Online,
        Duration::minutes(20),
    )
    .await;

    let sweeper = InactivitySweeper::new(Arc::clone(&ctx));
    let outcome = sweeper.sweep_once().await;
    let SweepOutcome::Completed(report) = outcome else {
        panic!("sweep was skipped");
    };
    assert_eq!(report.moved_to_offline, 1);
    assert_eq!(
        store.get_status(&visitor).await.unwrap(),
        PresenceStatus::Offline
    );

    let emissions = sink.wait_for(2).await;
    let rooms: Vec<&str> = emissions.iter().map(|e| e.room.as_str()).collect();
    assert!(rooms.contains(&visitor.room().as_str()));
    assert!(rooms.contains(&UserRef::commercial(commercial_id).room().as_str()));

    for emission in &emissions {
        assert_eq!(emission.event, PRESENCE_UPDATE);
        assert_eq!(emission.payload["previous_status"], "online");
        assert_eq!(emission.payload["new_status"], "offline");
        // Rooms are strictly relationship-scoped, never tenant-wide
        assert!(emission.room.parse::<UserRef>().is_ok());
    }

    notifier_task.abort();
}

#[tokio::test]
async fn concurrent_sweep_trigger_is_skipped_without_extra_scans() {
    let store = Arc::new(GatedStore::new());
    let chats = Arc::new(FakeChatRepository::new());
    let sink = Arc::new(RecordingSink::new());

    let (ctx, _receiver) = test_context(store.clone(), chats, sink);
    let sweeper = Arc::new(InactivitySweeper::new(ctx));

    // First tick parks inside the online listing
    let first = {
        let sweeper = Arc::clone(&sweeper);
        tokio::spawn(async move { sweeper.sweep_once().await })
    };
    while !sweeper.is_running() {
        tokio::time::sleep(StdDuration::from_millis(1)).await;
    }

    // A trigger while running is a no-op: no second scan of the store
    let second = sweeper.sweep_once().await;
    assert_eq!(second, SweepOutcome::Skipped);
    assert_eq!(store.list_calls(), 1);

    store.open_gate();
    let outcome = first.await.unwrap();
    assert_eq!(outcome, SweepOutcome::Completed(SweepReport::default()));

    // Once idle again, the next trigger scans as usual
    store.open_gate();
    let third = sweeper.sweep_once().await;
    assert!(matches!(third, SweepOutcome::Completed(_)));
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn offline_signal_reaches_recently_closed_correspondent() {
    let store = Arc::new(MemoryPresenceStore::new());
    let chats = Arc::new(FakeChatRepository::new());
    let sink = Arc::new(RecordingSink::new());

    let visitor_id = UserId::random();
    let commercial_id = UserId::random();
    let visitor = UserRef::visitor(visitor_id);
    chats.push(closed_chat(visitor_id, commercial_id, Duration::hours(2)));

    let (ctx, receiver) = test_context(store, chats, sink.clone());
    let notifier = Arc::new(PresenceChangeNotifier::from_context(&ctx));
    let notifier_task = notifier.start(receiver);

    let service = PresenceService::new(Arc::clone(&ctx));
    // Going online already fans out through the recency fallback
    service.heartbeat(&visitor, None).await;
    sink.wait_for(2).await;

    service.disconnect(&visitor).await;

    let emissions = sink.wait_for(4).await;
    let offline_rooms: Vec<&str> = emissions
        .iter()
        .filter(|e| e.payload["new_status"] == "offline")
        .map(|e| e.room.as_str())
        .collect();
    assert_eq!(offline_rooms.len(), 2);
    assert!(offline_rooms.contains(&visitor.room().as_str()));
    assert!(offline_rooms.contains(&UserRef::commercial(commercial_id).room().as_str()));

    notifier_task.abort();
}

#[tokio::test]
async fn long_closed_chat_degrades_to_self_only() {
    let store = Arc::new(MemoryPresenceStore::new());
    let chats = Arc::new(FakeChatRepository::new());
    let sink = Arc::new(RecordingSink::new());

    let visitor_id = UserId::random();
    let visitor = UserRef::visitor(visitor_id);
    chats.push(closed_chat(visitor_id, UserId::random(), Duration::hours(30)));

    let (ctx, receiver) = test_context(store, chats, sink.clone());
    let notifier = Arc::new(PresenceChangeNotifier::from_context(&ctx));
    let notifier_task = notifier.start(receiver);

    let service = PresenceService::new(Arc::clone(&ctx));
    service.set_status(&visitor, PresenceStatus::Online).await;

    let emissions = sink.wait_for(1).await;
    assert_eq!(emissions.len(), 1);
    assert_eq!(emissions[0].room, visitor.room());

    notifier_task.abort();
}

#[tokio::test]
async fn away_user_returns_online_on_genuine_activity() {
    let store = Arc::new(MemoryPresenceStore::new());
    let chats = Arc::new(FakeChatRepository::new());
    let sink = Arc::new(RecordingSink::new());

    let visitor = UserRef::visitor(UserId::random());

    let (ctx, receiver) = test_context(store.clone(), chats, sink.clone());
    let notifier = Arc::new(PresenceChangeNotifier::from_context(&ctx));
    let notifier_task = notifier.start(receiver);

    // Seven silent minutes: the sweep downgrades to away
    seed_stale(
        ctx.store(),
        &visitor,
        PresenceStatus::Online,
        Duration::minutes(7),
    )
    .await;
    let sweeper = InactivitySweeper::new(Arc::clone(&ctx));
    sweeper.sweep_once().await;
    assert_eq!(
        store.get_status(&visitor).await.unwrap(),
        PresenceStatus::Away
    );

    // Genuine interaction restores online
    let service = PresenceService::new(Arc::clone(&ctx));
    service.record_activity(&visitor).await;
    assert_eq!(
        store.get_status(&visitor).await.unwrap(),
        PresenceStatus::Online
    );

    let emissions = sink.wait_for(2).await;
    assert_eq!(emissions[0].payload["new_status"], "away");
    assert_eq!(emissions[1].payload["new_status"], "online");

    notifier_task.abort();
}
