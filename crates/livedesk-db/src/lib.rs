//! # livedesk-db
//!
//! PostgreSQL adapter for the chat relationship query. The chat tables are
//! owned by the chat subsystem; this crate only reads them to resolve which
//! counterparts a presence change must reach.

pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_env, DatabaseConfig};
pub use repositories::PgChatRepository;

/// Re-export of the sqlx PostgreSQL pool type
pub use sqlx::PgPool;
