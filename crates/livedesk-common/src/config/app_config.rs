//! Application configuration structs
//!
//! Loads configuration from environment variables.

use chrono::Duration;
use std::env;

use livedesk_core::{InvalidPolicy, PresencePolicy};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub presence: PresenceConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration (chat relationship queries)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration (presence store and room sink)
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Presence tuning parameters
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// Inactivity before a connected user is marked away (seconds)
    pub away_after_secs: u64,
    /// Inactivity before any user is marked offline (seconds)
    pub offline_after_secs: u64,
    /// Sweep cadence; must stay well below `away_after_secs`
    pub sweep_interval_secs: u64,
    /// TTL of a typing membership
    pub typing_ttl_secs: u64,
    /// TTL of the whole presence record
    pub record_ttl_secs: u64,
    /// Window during which a terminal chat still counts as a relationship
    pub closed_chat_window_secs: u64,
}

impl PresenceConfig {
    /// Build the domain policy from the configured thresholds
    pub fn policy(&self) -> Result<PresencePolicy, InvalidPolicy> {
        PresencePolicy::new(
            Duration::seconds(self.away_after_secs as i64),
            Duration::seconds(self.offline_after_secs as i64),
            Duration::seconds(self.closed_chat_window_secs as i64),
        )
    }

    #[must_use]
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }

    #[must_use]
    pub fn typing_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.typing_ttl_secs)
    }

    #[must_use]
    pub fn record_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.record_ttl_secs)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            away_after_secs: default_away_after(),
            offline_after_secs: default_offline_after(),
            sweep_interval_secs: default_sweep_interval(),
            typing_ttl_secs: default_typing_ttl(),
            record_ttl_secs: default_record_ttl(),
            closed_chat_window_secs: default_closed_chat_window(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "livedesk".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_away_after() -> u64 {
    300 // 5 minutes
}

fn default_offline_after() -> u64 {
    900 // 15 minutes
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_typing_ttl() -> u64 {
    10
}

fn default_record_ttl() -> u64 {
    86400 // 24 hours
}

fn default_closed_chat_window() -> u64 {
    86400 // 24 hours
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", default_max_connections()),
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", default_min_connections()),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL"))?,
                max_connections: env_or("REDIS_MAX_CONNECTIONS", default_redis_max_connections()),
            },
            presence: PresenceConfig {
                away_after_secs: env_or("PRESENCE_AWAY_AFTER_SECS", default_away_after()),
                offline_after_secs: env_or("PRESENCE_OFFLINE_AFTER_SECS", default_offline_after()),
                sweep_interval_secs: env_or(
                    "PRESENCE_SWEEP_INTERVAL_SECS",
                    default_sweep_interval(),
                ),
                typing_ttl_secs: env_or("PRESENCE_TYPING_TTL_SECS", default_typing_ttl()),
                record_ttl_secs: env_or("PRESENCE_RECORD_TTL_SECS", default_record_ttl()),
                closed_chat_window_secs: env_or(
                    "PRESENCE_CLOSED_CHAT_WINDOW_SECS",
                    default_closed_chat_window(),
                ),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
