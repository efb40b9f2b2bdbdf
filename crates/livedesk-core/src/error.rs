//! Errors at the core's capability boundaries.
//!
//! Presence is recoverable-by-design: the periodic sweep corrects any
//! transient inconsistency, so these errors are logged and degraded at the
//! service layer rather than surfaced to end users.

use thiserror::Error;

/// Presence store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Presence store backend error: {0}")]
    Backend(String),

    #[error("Presence record serialization error: {0}")]
    Serialization(String),
}

/// Result type for presence store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Chat relationship query failure; degrades to "no relationship data"
#[derive(Debug, Error)]
#[error("Chat relationship query failed: {0}")]
pub struct ChatQueryError(pub String);

/// Room emission failure; one target failing must not stop the others
#[derive(Debug, Error)]
#[error("Room emission failed: {0}")]
pub struct SinkError(pub String);
