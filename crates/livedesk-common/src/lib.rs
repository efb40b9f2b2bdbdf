//! # livedesk-common
//!
//! Shared utilities: environment-based configuration and telemetry setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, PresenceConfig, RedisConfig,
};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
