//! Presence worker entry point
//!
//! Run with:
//! ```bash
//! cargo run -p livedesk-worker
//! ```
//!
//! Configuration is loaded from environment variables. The worker owns the
//! periodic inactivity sweep and the notifier consumer; transport gateways
//! receive room events over Redis Pub/Sub.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use livedesk_cache::{RedisPool, RedisPresenceStore, RedisRoomSink};
use livedesk_common::{try_init_tracing, AppConfig, TracingConfig};
use livedesk_service::{
    EventBus, InactivitySweeper, PresenceChangeNotifier, ServiceContext,
};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing(&TracingConfig::default()) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Presence worker failed to start");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting presence worker...");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let policy = config
        .presence
        .policy()
        .context("Invalid presence thresholds")?;

    info!(
        env = ?config.app.env,
        sweep_interval_secs = config.presence.sweep_interval_secs,
        "Configuration loaded"
    );

    // Redis: presence store and room sink
    let redis_pool = RedisPool::from_config(&config.redis).context("Failed to create Redis pool")?;
    redis_pool
        .health_check()
        .await
        .context("Redis is unreachable")?;
    let store = Arc::new(RedisPresenceStore::from_config(
        redis_pool.clone(),
        &config.presence,
    ));
    let sink = Arc::new(RedisRoomSink::new(redis_pool));

    // PostgreSQL: chat relationship queries
    let db_config = livedesk_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..livedesk_db::DatabaseConfig::default()
    };
    let pg_pool = livedesk_db::create_pool(&db_config)
        .await
        .context("Failed to connect to PostgreSQL")?;
    let chat_repo = Arc::new(livedesk_db::PgChatRepository::new(pg_pool));

    let (bus, receiver) = EventBus::channel();
    let ctx = Arc::new(ServiceContext::new(store, chat_repo, sink, bus, policy));

    // Notifier consumes the bus; the sweeper feeds it on a fixed cadence
    let notifier = Arc::new(PresenceChangeNotifier::from_context(&ctx));
    let notifier_task = notifier.start(receiver);

    let sweeper = Arc::new(InactivitySweeper::new(Arc::clone(&ctx)));
    let sweeper_task = sweeper.start(config.presence.sweep_interval());

    info!("Presence worker started");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received, stopping");

    sweeper_task.abort();
    notifier_task.abort();

    Ok(())
}
