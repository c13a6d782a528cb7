//! Typed outcomes for every core operation.
//!
//! Actions return `MarketResult<T>`; the server layer maps each kind onto a
//! transport status. Validation and authorization failures are never
//! downgraded or retried.

use thiserror::Error;

use crate::common::auth::AuthError;
use crate::kernel::StoreError;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthenticated: valid bearer token required")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store temporarily unavailable: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    pub fn validation(message: impl Into<String>) -> Self {
        MarketError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        MarketError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<AuthError> for MarketError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationRequired => MarketError::Unauthenticated,
            AuthError::AdminRequired => MarketError::PermissionDenied(err.to_string()),
            AuthError::PermissionDenied(reason) => MarketError::PermissionDenied(reason),
        }
    }
}

impl From<StoreError> for MarketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => MarketError::Transient(msg),
            StoreError::Contention(msg) => MarketError::Conflict(msg),
            StoreError::Constraint(msg) => MarketError::Validation(msg),
            StoreError::Other(e) => MarketError::Internal(e),
        }
    }
}
