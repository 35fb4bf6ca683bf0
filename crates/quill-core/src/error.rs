//! Domain-level error types.

use thiserror::Error;

/// Core errors - the full failure taxonomy surfaced to the boundary layer.
///
/// `NotFound` deliberately covers both a genuinely missing object and an
/// object-level ownership denial, so callers cannot probe for existence.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Operation not permitted")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Store-level errors raised by entity store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Integrity(String),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => CoreError::NotFound,
            StoreError::Integrity(msg) => CoreError::Integrity(msg),
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}
