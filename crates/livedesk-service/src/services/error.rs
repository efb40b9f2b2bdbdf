//! Service layer error types

use livedesk_core::StoreError;

/// Service layer error type.
///
/// Presence writers swallow store failures (the sweep self-corrects), so
/// this type only surfaces from the query side.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Presence store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
