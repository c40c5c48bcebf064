//! Shared primitives for all Rust crates in Bizdesk.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use thiserror::Error;

pub use auth::{AccessToken, UserIdentity};

/// Result type used across Bizdesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Request carries no valid session or backend token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Upstream backend could not be reached or answered with a failure.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
